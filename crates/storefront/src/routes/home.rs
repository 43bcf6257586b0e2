//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use tracing::instrument;

use quartermaster_core::Page;

use crate::filters;
use crate::middleware::Store;
use crate::routes::{LayoutView, MessageQuery};
use crate::services::forms::ORDER_PLACED;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    pub success: Option<&'static str>,
}

/// Display the home page.
#[instrument(skip(store))]
pub async fn home(Store(mut store): Store, Query(query): Query<MessageQuery>) -> impl IntoResponse {
    store.set_current_page(Page::Home);

    let success = match query.success.as_deref() {
        Some("order_placed") => Some(ORDER_PLACED),
        _ => None,
    };

    HomeTemplate {
        layout: LayoutView::from_store(&store),
        success,
    }
}
