//! Product listing and detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use quartermaster_core::{Page, Product, ProductId};

use crate::filters;
use crate::middleware::Store;
use crate::routes::{LayoutView, MessageQuery};
use crate::store::StoreError;

/// Product card data for the listing.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Product detail data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub description: String,
    pub image_url: Option<String>,
    pub specs: Vec<(String, String)>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            specs: product.spec_rows(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: LayoutView,
    pub heading: String,
    pub products: Vec<ProductCardView>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: LayoutView,
    pub product: Option<ProductDetailView>,
    pub error: Option<String>,
}

/// Display the product listing, optionally filtered by category and name.
#[instrument(skip(store))]
pub async fn index(Store(mut store): Store, Query(query): Query<ProductsQuery>) -> impl IntoResponse {
    store.set_current_page(Page::Products);
    store.set_selected_category(query.category.filter(|slug| !slug.trim().is_empty()));
    store.set_search_query(query.q);

    let products = store.load_products().await;

    ProductsIndexTemplate {
        heading: store.category_title(),
        products: products.iter().map(ProductCardView::from).collect(),
        layout: LayoutView::from_store(&store),
    }
}

/// Display a single product.
///
/// Unknown or malformed ids render the page without a product.
#[instrument(skip(store))]
pub async fn show(
    Store(mut store): Store,
    Path(id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    match id.parse::<ProductId>() {
        Ok(id) => store.open_product(id).await,
        Err(_) => {
            store.set_selected_product(None);
            store.set_current_page(Page::ProductDetail);
        }
    }

    let error = match query.error.as_deref() {
        Some("size") => Some(StoreError::SizeRequired.to_string()),
        Some("quantity") => Some("Please enter a valid quantity".to_string()),
        Some("add_failed") => Some("Could not add to cart. Please try again.".to_string()),
        _ => None,
    };

    ProductShowTemplate {
        product: store.selected_product().map(ProductDetailView::from),
        error,
        layout: LayoutView::from_store(&store),
    }
}
