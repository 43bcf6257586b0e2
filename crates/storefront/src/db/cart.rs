//! `PostgreSQL` cart repository.

use async_trait::async_trait;
use sqlx::PgPool;

use quartermaster_core::{CartItem, CartItemId, NewCartItem, Product, Quantity, SessionId};

use super::RepositoryError;
use super::catalog::ProductRow;
use crate::repository::CartRepository;

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    line_id: CartItemId,
    quantity: i32,
    size: Option<String>,
    color: Option<String>,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(i64::from(row.quantity)).map_err(|e| {
            RepositoryError::DataCorruption(format!("cart item {}: {e}", row.line_id))
        })?;

        Ok(Self {
            id: row.line_id,
            product: Product::try_from(row.product)?,
            quantity,
            size: row.size,
            color: row.color,
        })
    }
}

/// Cart lines in the `cart_items` table.
#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn list_cart_items(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT ci.id AS line_id, ci.quantity, ci.size, ci.color,
                   p.id, p.category_id, p.name, p.description, p.price, p.sku,
                   p.image_url, p.specs, p.sizes, p.colors
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.session_id = $1
            ORDER BY ci.created_at, ci.id
            ",
        )
        .bind(session_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert_cart_item(&self, item: NewCartItem) -> Result<CartItemId, RepositoryError> {
        let result = sqlx::query_scalar::<_, CartItemId>(
            r"
            INSERT INTO cart_items (session_id, product_id, quantity, size, color)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(item.session_id.as_str())
        .bind(item.product_id)
        .bind(item.quantity.as_i32())
        .bind(item.size)
        .bind(item.color)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_cart_item_quantity(
        &self,
        session_id: &SessionId,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = $3, updated_at = NOW()
            WHERE id = $1 AND session_id = $2
            ",
        )
        .bind(id)
        .bind(session_id.as_str())
        .bind(quantity.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_cart_item(
        &self,
        session_id: &SessionId,
        id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE id = $1 AND session_id = $2
            ",
        )
        .bind(id)
        .bind(session_id.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
