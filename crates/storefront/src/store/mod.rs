//! Application state store.
//!
//! One [`AppStore`] is built per request from the shared repositories and the
//! browser's [`LocalStore`]. It owns navigation state, the category list, the
//! cached cart and the mock session/profile, and is the only place that
//! mutates the cart.
//!
//! # Failure model
//!
//! - Reads (`load_categories`, `refresh_cart`, `load_products`) fail soft:
//!   the previous value is kept and the error is logged.
//! - Cart mutations return a [`StoreError`] so the page can say what went
//!   wrong, and always refresh the cached cart before returning `Ok`.
//! - Login returns `false` for rejected credentials; it never errors.

mod locks;

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use quartermaster_core::{
    Allotment, CartItem, CartItemId, CartSummary, Category, CheckoutSummary, NewCartItem, Page,
    Price, Product, ProductFilter, ProductId, Profile, ProfilePatch, Quantity, QuantityError,
    SessionId,
};

pub use locks::CartLocks;

use crate::db::RepositoryError;
use crate::local::{LocalStore, LocalStoreError, Stored, keys, read_json, write_json};
use crate::repository::{CartRepository, CatalogRepository};
use crate::services::auth::CredentialVerifier;

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The product comes in sizes and none was chosen.
    #[error("Please select a size")]
    SizeRequired,

    #[error("invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    #[error("cart update failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// Collaborators an [`AppStore`] works with.
#[derive(Clone)]
pub struct StoreDeps {
    pub catalog: Arc<dyn CatalogRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub local: Arc<dyn LocalStore>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub cart_locks: CartLocks,
    /// Total spending allowance shown in the header.
    pub allotment: Price,
}

/// Per-browser application state.
pub struct AppStore {
    deps: StoreDeps,
    session_id: SessionId,

    // ===== Navigation =====
    current_page: Page,
    selected_category: Option<String>,
    selected_product: Option<Product>,
    search_query: Option<String>,

    // ===== Catalog and cart caches =====
    categories: Vec<Category>,
    cart_items: Vec<CartItem>,

    // ===== Mock session =====
    is_authenticated: bool,
    user_name: Option<String>,
    profile: Option<Profile>,
}

impl AppStore {
    /// Resolve the session, load categories and the cart, and restore the
    /// mock profile and sign-in state.
    #[instrument(skip_all)]
    pub async fn init(deps: StoreDeps) -> Self {
        let session_id = resolve_session_id(deps.local.as_ref()).await;
        let mut store = Self {
            deps,
            session_id,
            current_page: Page::default(),
            selected_category: None,
            selected_product: None,
            search_query: None,
            categories: Vec::new(),
            cart_items: Vec::new(),
            is_authenticated: false,
            user_name: None,
            profile: None,
        };

        store.load_categories().await;
        store.refresh_cart().await;
        store.restore_profile().await;
        store
    }

    async fn restore_profile(&mut self) {
        let local = self.deps.local.as_ref();

        self.profile = match read_json::<Profile>(local, keys::PROFILE).await {
            Stored::Present(profile) => Some(profile),
            Stored::Unreadable => None,
            Stored::Missing => {
                let profile = Profile::demo();
                if let Err(e) = write_json(local, keys::PROFILE, &profile).await {
                    tracing::warn!(error = %e, "Failed to persist default profile");
                }
                Some(profile)
            }
        };

        let marker = match local.get(keys::ACTIVE_USER).await {
            Ok(marker) => marker,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read sign-in marker");
                None
            }
        };

        if let Some(name) = marker {
            if self
                .profile
                .as_ref()
                .is_some_and(|profile| profile.username == name)
            {
                self.is_authenticated = true;
                self.user_name = Some(name);
            } else {
                tracing::debug!("Ignoring sign-in marker that does not match the stored profile");
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub const fn current_page(&self) -> Page {
        self.current_page
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    #[must_use]
    pub const fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn cart_items(&self) -> &[CartItem] {
        &self.cart_items
    }

    /// Total units in the cached cart.
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.cart_summary().units
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// The browser's local persistence.
    #[must_use]
    pub fn local(&self) -> &dyn LocalStore {
        self.deps.local.as_ref()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub const fn set_current_page(&mut self, page: Page) {
        self.current_page = page;
    }

    pub fn set_selected_category(&mut self, slug: Option<String>) {
        self.selected_category = slug;
    }

    pub fn set_selected_product(&mut self, product: Option<Product>) {
        self.selected_product = product;
    }

    pub fn set_search_query(&mut self, query: Option<String>) {
        self.search_query = query;
    }

    /// Select the product with `id` and show its detail page.
    ///
    /// An unknown id, or a failed lookup, leaves no product selected so the
    /// page renders its fallback.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn open_product(&mut self, id: ProductId) {
        let product = match self.deps.catalog.get_product(id).await {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load product");
                None
            }
        };
        self.set_selected_product(product);
        self.set_current_page(Page::ProductDetail);
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replace the category list. Keeps the previous list on failure.
    #[instrument(skip(self))]
    pub async fn load_categories(&mut self) {
        match self.deps.catalog.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(e) => tracing::warn!(error = %e, "Failed to load categories"),
        }
    }

    /// Products for the current category selection and search query.
    ///
    /// An unknown category slug lists the whole catalog. Empty on failure.
    #[instrument(skip(self))]
    pub async fn load_products(&self) -> Vec<Product> {
        let mut filter = ProductFilter::default();
        if let Some(category) = self.selected_category_entry() {
            filter = filter.in_category(category.id);
        }
        if let Some(query) = self.search_query() {
            filter = filter.named(query);
        }

        match self.deps.catalog.list_products(&filter).await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load products");
                Vec::new()
            }
        }
    }

    /// Heading for the product list.
    #[must_use]
    pub fn category_title(&self) -> String {
        match (&self.selected_category, self.selected_category_entry()) {
            (None, _) => "All Products".to_string(),
            (Some(_), Some(category)) => category.name.clone(),
            (Some(_), None) => "Products".to_string(),
        }
    }

    fn selected_category_entry(&self) -> Option<&Category> {
        let slug = self.selected_category.as_deref()?;
        self.categories.iter().find(|category| category.slug == slug)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Replace the cached cart with the repository's view of this session.
    /// Keeps the stale cache on failure.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn refresh_cart(&mut self) {
        match self.deps.carts.list_cart_items(&self.session_id).await {
            Ok(items) => self.cart_items = items,
            Err(e) => tracing::warn!(error = %e, "Failed to refresh cart"),
        }
    }

    /// Add a line for `product` and refresh the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SizeRequired` when the product has sizes and
    /// `size` is blank, or `StoreError::Repository` if the insert fails.
    #[instrument(skip(self, product), fields(session_id = %self.session_id, product_id = %product.id))]
    pub async fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: Quantity,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<CartItemId, StoreError> {
        let size = non_blank(size);
        if product.requires_size() && size.is_none() {
            return Err(StoreError::SizeRequired);
        }

        let lock = self.deps.cart_locks.for_session(&self.session_id);
        let _guard = lock.lock().await;

        let id = self
            .deps
            .carts
            .insert_cart_item(NewCartItem {
                session_id: self.session_id.clone(),
                product_id: product.id,
                quantity,
                size,
                color: non_blank(color),
            })
            .await?;
        self.refresh_cart().await;

        tracing::info!(cart_item_id = %id, quantity = %quantity, "Added to cart");
        Ok(id)
    }

    /// Set a line's quantity and refresh the cart. Quantities below one are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Quantity` if the quantity is out of range, or
    /// `StoreError::Repository` if the update fails.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn update_quantity(&mut self, id: CartItemId, quantity: i64) -> Result<(), StoreError> {
        if quantity < 1 {
            return Ok(());
        }
        let quantity = Quantity::new(quantity)?;

        let lock = self.deps.cart_locks.for_session(&self.session_id);
        let _guard = lock.lock().await;

        self.deps
            .carts
            .update_cart_item_quantity(&self.session_id, id, quantity)
            .await?;
        self.refresh_cart().await;
        Ok(())
    }

    /// Remove a line and refresh the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the delete fails.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn remove_item(&mut self, id: CartItemId) -> Result<(), StoreError> {
        let lock = self.deps.cart_locks.for_session(&self.session_id);
        let _guard = lock.lock().await;

        self.deps
            .carts
            .delete_cart_item(&self.session_id, id)
            .await?;
        self.refresh_cart().await;
        Ok(())
    }

    #[must_use]
    pub fn cart_summary(&self) -> CartSummary {
        CartSummary::of(&self.cart_items)
    }

    #[must_use]
    pub fn checkout_summary(&self) -> CheckoutSummary {
        CheckoutSummary::of(&self.cart_items)
    }

    #[must_use]
    pub fn allotment(&self) -> Allotment {
        Allotment::new(self.deps.allotment).with_cart(self.cart_summary().subtotal)
    }

    // =========================================================================
    // Mock session
    // =========================================================================

    /// Check credentials and sign in. Returns `false` and changes nothing
    /// when the pair is rejected.
    #[instrument(skip(self, password), fields(session_id = %self.session_id))]
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        let Some(profile) = self
            .deps
            .verifier
            .verify(self.deps.local.as_ref(), username, password)
            .await
        else {
            tracing::info!("Sign-in rejected");
            return false;
        };

        if let Err(e) = self.deps.local.set(keys::ACTIVE_USER, username).await {
            tracing::warn!(error = %e, "Failed to persist sign-in marker");
        }
        self.is_authenticated = true;
        self.user_name = Some(username.to_owned());
        self.profile = Some(profile);
        tracing::info!("Signed in");
        true
    }

    /// Merge `patch` into the stored profile and persist it.
    ///
    /// When signed in, a non-empty merged username also updates the display
    /// name and the sign-in marker. A failed write is logged and ignored; use
    /// [`AppStore::try_update_profile`] when the caller must report it.
    #[instrument(skip_all, fields(session_id = %self.session_id))]
    pub async fn update_profile(&mut self, patch: ProfilePatch) {
        if let Err(e) = self.try_update_profile(patch).await {
            tracing::warn!(error = %e, "Failed to persist profile");
        }
    }

    /// Like [`AppStore::update_profile`], but returns the persistence error.
    ///
    /// The cached profile and display name change only after the profile
    /// write succeeds.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError` if the profile cannot be written.
    pub async fn try_update_profile(&mut self, patch: ProfilePatch) -> Result<(), LocalStoreError> {
        let local = self.deps.local.as_ref();
        let current = read_json::<Profile>(local, keys::PROFILE)
            .await
            .present()
            .unwrap_or_default();
        let merged = current.merged(patch);

        write_json(local, keys::PROFILE, &merged).await?;

        if self.is_authenticated && !merged.username.is_empty() {
            if let Err(e) = local.set(keys::ACTIVE_USER, &merged.username).await {
                tracing::warn!(error = %e, "Failed to persist sign-in marker");
            }
            self.user_name = Some(merged.username.clone());
        }
        self.profile = Some(merged);
        Ok(())
    }

    /// Sign out and go home. The profile itself is kept.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn logout(&mut self) {
        self.is_authenticated = false;
        self.user_name = None;
        if let Err(e) = self.deps.local.remove(keys::ACTIVE_USER).await {
            tracing::warn!(error = %e, "Failed to clear sign-in marker");
        }
        self.set_current_page(Page::Home);
    }
}

/// Read the persisted session id, generating and persisting one if absent.
async fn resolve_session_id(local: &dyn LocalStore) -> SessionId {
    match local.get(keys::SESSION_ID).await {
        Ok(Some(stored)) => {
            if let Some(id) = SessionId::from_stored(&stored) {
                return id;
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read session id"),
    }

    let id = SessionId::generate();
    if let Err(e) = local.set(keys::SESSION_ID, id.as_str()).await {
        tracing::warn!(error = %e, "Failed to persist session id");
    }
    id
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
