//! `PostgreSQL` catalog repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use quartermaster_core::{Category, CategoryId, Price, Product, ProductFilter, ProductId};

use super::{RepositoryError, like_pattern};
use crate::repository::CatalogRepository;

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

/// Product columns, shared with the cart join.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ProductRow {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub image_url: Option<String>,
    pub specs: Json<serde_json::Value>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if row.price.is_sign_negative() {
            return Err(RepositoryError::DataCorruption(format!(
                "negative price for product {}",
                row.id
            )));
        }

        let specs: BTreeMap<String, serde_json::Value> = match row.specs.0 {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            serde_json::Value::Null => BTreeMap::new(),
            other => {
                return Err(RepositoryError::DataCorruption(format!(
                    "specs for product {} is not an object: {other}",
                    row.id
                )));
            }
        };

        Ok(Self {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            price: Price::new(row.price),
            sku: row.sku,
            image_url: row.image_url.filter(|url| !url.is_empty()),
            specs,
            sizes: row.sizes,
            colors: row.colors,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Catalog reads against the `categories` and `products` tables.
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug
            FROM categories
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let name_pattern = filter.name_contains.as_deref().map(like_pattern);

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, category_id, name, description, price, sku, image_url,
                   specs, sizes, colors
            FROM products
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::text IS NULL OR name ILIKE $2)
            ORDER BY name
            ",
        )
        .bind(filter.category_id)
        .bind(name_pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, category_id, name, description, price, sku, image_url,
                   specs, sizes, colors
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
