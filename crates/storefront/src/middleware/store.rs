//! Extractor that builds the per-request application state store.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::local::SessionLocalStore;
use crate::state::AppState;
use crate::store::AppStore;

/// An [`AppStore`] bound to the requesting browser's session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Store(mut store): Store) -> impl IntoResponse {
///     store.set_current_page(Page::Cart);
///     format!("{} items", store.cart_count())
/// }
/// ```
pub struct Store(pub AppStore);

impl FromRequestParts<AppState> for Store {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let local = Arc::new(SessionLocalStore::new(session));
        Ok(Self(AppStore::init(state.store_deps(local)).await))
    }
}
