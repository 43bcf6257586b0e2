//! Quartermaster Storefront library.
//!
//! This crate provides the storefront functionality as a library so the
//! binary, the CLI and the integration tests share one router and one
//! application state store.
//!
//! # Layers
//!
//! - [`store`] - Per-browser application state: navigation, catalog snapshot,
//!   cart cache and the mock session/profile
//! - [`repository`] - Catalog and cart repository traits, with `PostgreSQL`
//!   and in-memory implementations in [`db`]
//! - [`local`] - Per-browser key-value persistence backed by the session
//! - [`services`] - Credential verification and the mock account book
//! - [`routes`] - Axum handlers and askama templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod local;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::Router;
use axum::http::Request;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use state::AppState;

/// Directory holding the compiled CSS and images.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the full storefront application.
///
/// The session layer is passed in so production can use the `PostgreSQL`
/// session store while tests use the in-memory one.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes::routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(routes::not_found)
        .layer(sessions)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
