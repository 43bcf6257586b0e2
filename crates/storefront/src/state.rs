//! Application state shared across handlers.

use std::sync::Arc;

use quartermaster_core::Price;
use sqlx::PgPool;

use crate::db::{PgCartRepository, PgCatalogRepository};
use crate::local::LocalStore;
use crate::repository::{CartRepository, CatalogRepository};
use crate::services::auth::{CredentialVerifier, LocalProfileVerifier};
use crate::store::{CartLocks, StoreDeps};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds the repositories,
/// the per-session cart locks and, in production, the database pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: Option<PgPool>,
    catalog: Arc<dyn CatalogRepository>,
    carts: Arc<dyn CartRepository>,
    verifier: Arc<dyn CredentialVerifier>,
    cart_locks: CartLocks,
    allotment: Price,
}

impl AppState {
    /// State backed by `PostgreSQL` repositories.
    #[must_use]
    pub fn postgres(pool: PgPool, allotment: Price) -> Self {
        Self::build(
            Some(pool.clone()),
            Arc::new(PgCatalogRepository::new(pool.clone())),
            Arc::new(PgCartRepository::new(pool)),
            allotment,
        )
    }

    /// State backed by arbitrary repositories, e.g. the in-memory ones.
    #[must_use]
    pub fn with_repositories(
        catalog: Arc<dyn CatalogRepository>,
        carts: Arc<dyn CartRepository>,
        allotment: Price,
    ) -> Self {
        Self::build(None, catalog, carts, allotment)
    }

    fn build(
        pool: Option<PgPool>,
        catalog: Arc<dyn CatalogRepository>,
        carts: Arc<dyn CartRepository>,
        allotment: Price,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                catalog,
                carts,
                verifier: Arc::new(LocalProfileVerifier),
                cart_locks: CartLocks::new(),
                allotment,
            }),
        }
    }

    /// The database pool, when running against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn allotment(&self) -> Price {
        self.inner.allotment
    }

    /// Collaborators for an `AppStore` bound to one browser's local store.
    #[must_use]
    pub fn store_deps(&self, local: Arc<dyn LocalStore>) -> StoreDeps {
        StoreDeps {
            catalog: Arc::clone(&self.inner.catalog),
            carts: Arc::clone(&self.inner.carts),
            local,
            verifier: Arc::clone(&self.inner.verifier),
            cart_locks: self.inner.cart_locks.clone(),
            allotment: self.inner.allotment,
        }
    }
}
