//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (database)
//!
//! # Products
//! GET  /products?category&q       - Product listing
//! GET  /products/{id}             - Product detail
//!
//! # Cart
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add line, redirect to /cart
//! POST /cart/update               - Change quantity
//! POST /cart/remove               - Remove line
//! GET  /cart/count                - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                  - Order information form
//! POST /checkout                  - Place demo order
//!
//! # Account
//! GET  /account?tab               - Account dashboard
//! POST /account/password          - Change password
//! POST /account/email             - Change email
//! POST /account/security          - Change security question
//! POST /account/addresses         - Add address
//! POST /account/addresses/{id}    - Update address
//! POST /account/addresses/{id}/delete
//! POST /account/phones            - Add phone
//! POST /account/phones/{id}       - Update phone
//! POST /account/phones/{id}/delete
//!
//! # Mock sign-in
//! GET  /signin          POST /signin
//! POST /logout
//! GET  /forgot-password POST /forgot-password
//! GET  /request-account POST /request-account
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod products;

use axum::{
    Router,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use quartermaster_core::{Allotment, Page};

use crate::error::AppError;
use crate::state::AppState;
use crate::store::AppStore;

// =============================================================================
// Shared View Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Category entry in the header navigation.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub name: String,
    pub slug: String,
    pub active: bool,
}

/// Allotment figures for the header, formatted as `$0.00`.
#[derive(Debug, Clone)]
pub struct AllotmentView {
    pub total: String,
    pub used: String,
    pub in_cart: String,
    pub available: String,
}

impl From<Allotment> for AllotmentView {
    fn from(allotment: Allotment) -> Self {
        Self {
            total: allotment.total.to_string(),
            used: allotment.used.to_string(),
            in_cart: allotment.in_cart.to_string(),
            available: allotment.available().to_string(),
        }
    }
}

/// Everything the base layout needs, taken from the store after the handler
/// has set the current page.
#[derive(Debug, Clone)]
pub struct LayoutView {
    pub title: &'static str,
    pub page: &'static str,
    pub show_header: bool,
    pub is_authenticated: bool,
    pub welcome_name: String,
    pub cart_count: u32,
    pub categories: Vec<CategoryLink>,
    /// The unfiltered listing is showing.
    pub all_products_active: bool,
    pub search_query: String,
    pub allotment: AllotmentView,
}

impl LayoutView {
    #[must_use]
    pub fn from_store(store: &AppStore) -> Self {
        let page = store.current_page();
        let selected = store.selected_category();
        let categories: Vec<CategoryLink> = store
            .categories()
            .iter()
            .map(|c| CategoryLink {
                name: c.name.clone(),
                slug: c.slug.clone(),
                active: page == Page::Products && selected == Some(c.slug.as_str()),
            })
            .collect();
        Self {
            title: page.title(),
            page: page.slug(),
            show_header: page.shows_header(),
            is_authenticated: store.is_authenticated(),
            welcome_name: store
                .user_name()
                .map_or_else(|| "GUEST".to_string(), str::to_uppercase),
            cart_count: store.cart_count(),
            all_products_active: page == Page::Products && selected.is_none(),
            categories,
            search_query: store.search_query().unwrap_or_default().to_string(),
            allotment: store.allotment().into(),
        }
    }
}

/// Percent-encode a value for a redirect query string.
pub(crate) fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

// =============================================================================
// Routers
// =============================================================================

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/password", post(account::change_password))
        .route("/email", post(account::change_email))
        .route("/security", post(account::change_security))
        .route("/addresses", post(account::add_address))
        .route("/addresses/{id}", post(account::update_address))
        .route("/addresses/{id}/delete", post(account::delete_address))
        .route("/phones", post(account::add_phone))
        .route("/phones/{id}", post(account::update_phone))
        .route("/phones/{id}/delete", post(account::delete_phone))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::page).post(checkout::submit))
        .nest("/account", account_routes())
        .route("/signin", get(auth::signin_page).post(auth::signin))
        .route("/logout", post(auth::logout))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route(
            "/request-account",
            get(auth::request_account_page).post(auth::request_account),
        )
}

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    AppError::NotFound("page".to_string())
}
