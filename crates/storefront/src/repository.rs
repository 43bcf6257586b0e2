//! Repository seams between the application state store and persistence.
//!
//! Production wires the `PostgreSQL` implementations from [`crate::db`];
//! tests and local demos use the in-memory ones.

use async_trait::async_trait;
use quartermaster_core::{
    CartItem, CartItemId, Category, NewCartItem, Product, ProductFilter, ProductId, Quantity,
    SessionId,
};

use crate::db::RepositoryError;

/// Read access to categories and products.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Products matching `filter`, ordered by name.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;

    /// A single product, or `None` when the id is unknown.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
}

/// Cart lines keyed by shopper session.
///
/// Updates and deletes are scoped to the owning session so one browser can
/// never touch another's lines.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Lines for `session_id`, oldest first, each joined with its product.
    async fn list_cart_items(&self, session_id: &SessionId)
    -> Result<Vec<CartItem>, RepositoryError>;

    /// Insert a new line. Fails with `NotFound` if the product does not exist.
    async fn insert_cart_item(&self, item: NewCartItem) -> Result<CartItemId, RepositoryError>;

    /// Set a line's quantity. Fails with `NotFound` if the line is not in this session.
    async fn update_cart_item_quantity(
        &self,
        session_id: &SessionId,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<(), RepositoryError>;

    /// Delete a line. Fails with `NotFound` if the line is not in this session.
    async fn delete_cart_item(
        &self,
        session_id: &SessionId,
        id: CartItemId,
    ) -> Result<(), RepositoryError>;
}
