//! Checkout route handlers.
//!
//! Checkout collects order information and places a demo order. Nothing is
//! charged and the cart is left as it is.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use quartermaster_core::{CheckoutSummary, Page};

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::Store;
use crate::routes::LayoutView;
use crate::routes::cart::CartItemView;
use crate::services::forms::{CheckoutForm, SHIPPING_METHODS};
use crate::store::AppStore;

/// Order totals, formatted for display.
#[derive(Clone)]
pub struct CheckoutSummaryView {
    pub units: u32,
    pub subtotal: String,
    pub shipping: String,
    pub taxes: String,
    pub total: String,
}

impl From<CheckoutSummary> for CheckoutSummaryView {
    fn from(summary: CheckoutSummary) -> Self {
        Self {
            units: summary.units,
            subtotal: summary.subtotal.to_string(),
            shipping: summary.shipping.to_string(),
            taxes: summary.taxes.to_string(),
            total: summary.total().to_string(),
        }
    }
}

/// Shipping method choice.
#[derive(Clone)]
pub struct ShippingOption {
    pub name: &'static str,
    pub selected: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub layout: LayoutView,
    pub form: CheckoutForm,
    pub shipping_methods: Vec<ShippingOption>,
    pub items: Vec<CartItemView>,
    pub summary: CheckoutSummaryView,
    pub error: Option<String>,
}

fn render(store: &AppStore, form: CheckoutForm, error: Option<String>) -> CheckoutTemplate {
    CheckoutTemplate {
        layout: LayoutView::from_store(store),
        shipping_methods: SHIPPING_METHODS
            .iter()
            .map(|&name| ShippingOption {
                name,
                selected: name == form.shipping_method,
            })
            .collect(),
        form,
        items: store.cart_items().iter().map(CartItemView::from).collect(),
        summary: store.checkout_summary().into(),
        error,
    }
}

/// Display the checkout form, prefilled with the demo order information.
#[instrument(skip(store))]
pub async fn page(Store(mut store): Store) -> impl IntoResponse {
    store.set_current_page(Page::Checkout);
    render(&store, CheckoutForm::default(), None)
}

/// Place a demo order.
///
/// Missing fields re-render the form with what was entered.
#[instrument(skip(store, form))]
pub async fn submit(Store(mut store): Store, Form(form): Form<CheckoutForm>) -> Response {
    store.set_current_page(Page::Checkout);

    if let Err(e) = form.validate() {
        let error = Some(e.to_string());
        return (StatusCode::UNPROCESSABLE_ENTITY, render(&store, form, error)).into_response();
    }

    add_breadcrumb(
        "checkout",
        "Demo order placed",
        Some(&[("shipping_method", form.shipping_method.as_str())]),
    );
    tracing::info!(units = store.cart_summary().units, "Demo order placed");

    store.set_current_page(Page::Home);
    Redirect::to("/?success=order_placed").into_response()
}
