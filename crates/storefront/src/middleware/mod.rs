//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, new hub per request)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, `PostgreSQL` store in production)
//!
//! The [`Store`] extractor then builds the per-request `AppStore` from the
//! session.

pub mod request_id;
pub mod session;
pub mod store;

pub use request_id::request_id_middleware;
pub use session::create_session_layer;
pub use store::Store;
