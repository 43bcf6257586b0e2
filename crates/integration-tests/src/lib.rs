//! Integration tests for the Quartermaster storefront.
//!
//! Tests drive the real router with `tower::ServiceExt::oneshot`, backed by
//! the in-memory catalog and cart repositories and an in-memory session
//! store. No database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quartermaster-integration-tests
//! ```
//!
//! A [`Browser`] carries its session cookie between requests, so each one
//! behaves like a separate shopper.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use quartermaster_core::{Price, Product, Profile};
use quartermaster_storefront::db::{CatalogSeed, MemoryCarts, MemoryCatalog};
use quartermaster_storefront::middleware::create_session_layer;
use quartermaster_storefront::state::AppState;

/// Demo catalog shipped with the CLI.
pub const CATALOG_YAML: &str = include_str!("../../cli/seed/catalog.yaml");

/// A storefront wired to in-memory repositories.
pub struct TestApp {
    pub router: Router,
    pub catalog: Arc<MemoryCatalog>,
    pub carts: Arc<MemoryCarts>,
}

impl TestApp {
    /// Storefront over the demo catalog with the standard allotment.
    #[must_use]
    pub fn new() -> Self {
        let seed = CatalogSeed::from_yaml(CATALOG_YAML).unwrap();
        let catalog = Arc::new(MemoryCatalog::from_seed(&seed));
        let carts = Arc::new(MemoryCarts::new(Arc::clone(&catalog)));

        let state = AppState::with_repositories(
            catalog.clone(),
            carts.clone(),
            Price::from_cents(99_999),
        );
        let sessions = create_session_layer(MemoryStore::default(), false);

        Self {
            router: quartermaster_storefront::app(state, sessions),
            catalog,
            carts,
        }
    }

    /// A new shopper with no cookies.
    #[must_use]
    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Look up a demo product by SKU.
    pub async fn product(&self, sku: &str) -> Product {
        self.catalog.product_by_sku(sku).await.unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A response with its body read into a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Assert a redirect and return its target.
    #[must_use]
    pub fn redirect_target(&self) -> &str {
        assert!(
            self.status.is_redirection(),
            "expected redirect, got {}",
            self.status
        );
        self.location.as_deref().unwrap()
    }
}

/// One shopper's cookie jar over the shared router.
pub struct Browser {
    router: Router,
    cookie: Option<String>,
}

impl Browser {
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::builder().method("GET").uri(path);
        self.send(request, Body::empty()).await
    }

    /// POST an url-encoded form.
    pub async fn post(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(body)).await
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// Sign in with the demo credentials.
    pub async fn sign_in(&mut self) {
        let response = self
            .post(
                "/signin",
                &[
                    ("username", Profile::DEMO_USERNAME),
                    ("password", Profile::DEMO_PASSWORD),
                ],
            )
            .await;
        assert_eq!(response.redirect_target(), "/");
    }
}
