//! Cart route handlers.
//!
//! Every mutation goes through the [`AppStore`](crate::store::AppStore), which
//! refreshes its cached cart afterwards. Handlers redirect with an `error`
//! code instead of failing the request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use quartermaster_core::{CartItem, CartItemId, Page, ProductId, Quantity};

use crate::db::RepositoryError;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::Store;
use crate::routes::{LayoutView, MessageQuery, encode};
use crate::store::StoreError;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            sku: item.product.sku.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            quantity: item.quantity.get(),
            price: item.product.price.to_string(),
            line_price: item.line_total().to_string(),
            image_url: item.product.image_url.clone(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutView,
    pub items: Vec<CartItemView>,
    pub units: u32,
    pub subtotal: String,
    pub error: Option<&'static str>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "not_found" => Some("That item is no longer in your cart"),
        "quantity" => Some("Please enter a valid quantity"),
        "update_failed" => Some("Could not update your cart. Please try again."),
        "remove_failed" => Some("Could not remove the item. Please try again."),
        _ => None,
    }
}

fn mutation_error_code(err: &StoreError, fallback: &'static str) -> &'static str {
    match err {
        StoreError::Repository(RepositoryError::NotFound) => "not_found",
        StoreError::Quantity(_) => "quantity",
        _ => fallback,
    }
}

/// Display cart page.
#[instrument(skip(store))]
pub async fn show(Store(mut store): Store, Query(query): Query<MessageQuery>) -> impl IntoResponse {
    store.set_current_page(Page::Cart);
    let summary = store.cart_summary();

    CartShowTemplate {
        items: store.cart_items().iter().map(CartItemView::from).collect(),
        units: summary.units,
        subtotal: summary.subtotal.to_string(),
        error: query.error.as_deref().and_then(error_message),
        layout: LayoutView::from_store(&store),
    }
}

/// Add a product to the cart and go to the cart page.
///
/// Sized products without a size go back to the product page with
/// `error=size`.
#[instrument(skip(store))]
pub async fn add(Store(mut store): Store, Form(form): Form<AddToCartForm>) -> Response {
    let Ok(product_id) = form.product_id.parse::<ProductId>() else {
        return Redirect::to("/products").into_response();
    };
    let product_url = format!("/products/{product_id}");

    let quantity = form
        .quantity
        .as_deref()
        .map_or(Ok(1), |raw| raw.trim().parse::<i64>())
        .ok()
        .and_then(|raw| Quantity::new(raw).ok());
    let Some(quantity) = quantity else {
        return Redirect::to(&format!("{product_url}?error=quantity")).into_response();
    };

    store.open_product(product_id).await;
    let Some(product) = store.selected_product().cloned() else {
        return Redirect::to(&product_url).into_response();
    };

    match store
        .add_to_cart(&product, quantity, form.size, form.color)
        .await
    {
        Ok(_) => {
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[
                    ("sku", product.sku.as_str()),
                    ("quantity", quantity.to_string().as_str()),
                ]),
            );
            Redirect::to("/cart").into_response()
        }
        Err(StoreError::SizeRequired) => {
            Redirect::to(&format!("{product_url}?error=size")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to add item to cart");
            Redirect::to(&format!("{product_url}?error=add_failed")).into_response()
        }
    }
}

/// Update a cart line's quantity.
///
/// Quantities below one leave the line unchanged.
#[instrument(skip(store))]
pub async fn update(Store(mut store): Store, Form(form): Form<UpdateCartForm>) -> Response {
    let Ok(item_id) = form.item_id.parse::<CartItemId>() else {
        return Redirect::to("/cart?error=not_found").into_response();
    };
    let Ok(quantity) = form.quantity.trim().parse::<i64>() else {
        return Redirect::to("/cart?error=quantity").into_response();
    };

    match store.update_quantity(item_id, quantity).await {
        Ok(()) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to update cart");
            let code = mutation_error_code(&e, "update_failed");
            Redirect::to(&format!("/cart?error={}", encode(code))).into_response()
        }
    }
}

/// Remove a cart line.
#[instrument(skip(store))]
pub async fn remove(Store(mut store): Store, Form(form): Form<RemoveFromCartForm>) -> Response {
    let Ok(item_id) = form.item_id.parse::<CartItemId>() else {
        return Redirect::to("/cart?error=not_found").into_response();
    };

    match store.remove_item(item_id).await {
        Ok(()) => {
            add_breadcrumb("cart", "Removed from cart", None);
            Redirect::to("/cart").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to remove from cart");
            let code = mutation_error_code(&e, "remove_failed");
            Redirect::to(&format!("/cart?error={}", encode(code))).into_response()
        }
    }
}

/// Get cart item count (badge fragment).
#[instrument(skip(store))]
pub async fn count(Store(store): Store) -> impl IntoResponse {
    CartCountTemplate {
        count: store.cart_count(),
    }
}
