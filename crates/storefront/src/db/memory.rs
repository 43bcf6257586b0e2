//! In-memory repositories for tests and database-free demos.
//!
//! Both repositories can be switched into a failing mode to exercise the
//! fail-soft paths of the application state store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quartermaster_core::{
    CartItem, CartItemId, Category, CategoryId, NewCartItem, Price, Product, ProductFilter,
    ProductId, Quantity, SessionId,
};

use super::{CatalogSeed, RepositoryError};
use crate::repository::{CartRepository, CatalogRepository};

fn check_available(failing: &AtomicBool) -> Result<(), RepositoryError> {
    if failing.load(Ordering::Relaxed) {
        return Err(RepositoryError::Unavailable(
            "in-memory repository set to fail".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

/// Catalog held in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    categories: RwLock<Vec<Category>>,
    products: RwLock<Vec<Product>>,
    failing: AtomicBool,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Self {
            categories: RwLock::new(categories),
            products: RwLock::new(products),
            failing: AtomicBool::new(false),
        }
    }

    /// Build a catalog from a seed document, assigning fresh ids.
    #[must_use]
    pub fn from_seed(seed: &CatalogSeed) -> Self {
        let mut categories = Vec::with_capacity(seed.categories.len());
        let mut products = Vec::new();

        for category in &seed.categories {
            let category_id = CategoryId::random();
            categories.push(Category {
                id: category_id,
                name: category.name.clone(),
                slug: category.slug.clone(),
            });
            products.extend(category.products.iter().map(|p| Product {
                id: ProductId::random(),
                category_id: Some(category_id),
                name: p.name.clone(),
                description: p.description.clone().unwrap_or_default(),
                price: Price::new(p.price),
                sku: p.sku.clone(),
                image_url: p.image_url.clone(),
                specs: p.specs.clone(),
                sizes: p.sizes.clone(),
                colors: p.colors.clone(),
            }));
        }

        Self::new(categories, products)
    }

    /// Make every call fail with `RepositoryError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Look up a product by SKU.
    pub async fn product_by_sku(&self, sku: &str) -> Option<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.sku == sku)
            .cloned()
    }

    async fn product(&self, id: ProductId) -> Option<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        check_available(&self.failing)?;
        let mut categories = self.categories.read().await.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        check_available(&self.failing)?;
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        check_available(&self.failing)?;
        Ok(self.product(id).await)
    }
}

// =============================================================================
// Carts
// =============================================================================

#[derive(Debug, Clone)]
struct StoredLine {
    id: CartItemId,
    session_id: SessionId,
    product_id: ProductId,
    quantity: Quantity,
    size: Option<String>,
    color: Option<String>,
}

/// Cart lines held in memory, joined against a [`MemoryCatalog`].
#[derive(Debug)]
pub struct MemoryCarts {
    catalog: Arc<MemoryCatalog>,
    lines: RwLock<Vec<StoredLine>>,
    failing: AtomicBool,
}

impl MemoryCarts {
    #[must_use]
    pub fn new(catalog: Arc<MemoryCatalog>) -> Self {
        Self {
            catalog,
            lines: RwLock::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every call fail with `RepositoryError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Number of stored lines across all sessions.
    pub async fn line_count(&self) -> usize {
        self.lines.read().await.len()
    }
}

#[async_trait]
impl CartRepository for MemoryCarts {
    async fn list_cart_items(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        check_available(&self.failing)?;
        let lines: Vec<StoredLine> = self
            .lines
            .read()
            .await
            .iter()
            .filter(|line| &line.session_id == session_id)
            .cloned()
            .collect();

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            // Lines whose product disappeared drop out, like an inner join.
            if let Some(product) = self.catalog.product(line.product_id).await {
                items.push(CartItem {
                    id: line.id,
                    product,
                    quantity: line.quantity,
                    size: line.size,
                    color: line.color,
                });
            }
        }
        Ok(items)
    }

    async fn insert_cart_item(&self, item: NewCartItem) -> Result<CartItemId, RepositoryError> {
        check_available(&self.failing)?;
        if self.catalog.product(item.product_id).await.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let id = CartItemId::random();
        self.lines.write().await.push(StoredLine {
            id,
            session_id: item.session_id,
            product_id: item.product_id,
            quantity: item.quantity,
            size: item.size,
            color: item.color,
        });
        Ok(id)
    }

    async fn update_cart_item_quantity(
        &self,
        session_id: &SessionId,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<(), RepositoryError> {
        check_available(&self.failing)?;
        let mut lines = self.lines.write().await;
        let line = lines
            .iter_mut()
            .find(|line| line.id == id && &line.session_id == session_id)
            .ok_or(RepositoryError::NotFound)?;
        line.quantity = quantity;
        Ok(())
    }

    async fn delete_cart_item(
        &self,
        session_id: &SessionId,
        id: CartItemId,
    ) -> Result<(), RepositoryError> {
        check_available(&self.failing)?;
        let mut lines = self.lines.write().await;
        let before = lines.len();
        lines.retain(|line| !(line.id == id && &line.session_id == session_id));
        if lines.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
