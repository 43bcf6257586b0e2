//! Per-browser key-value persistence.
//!
//! The storefront keeps a handful of small string values per browser: the
//! anonymous shopper session id, the signed-in marker, the mock profile and
//! the mock address/phone lists. Structured values are stored as JSON text.
//!
//! In the web app the values live in the tower-sessions record behind the
//! session cookie ([`SessionLocalStore`]); tests use [`MemoryLocalStore`].

mod memory;
mod session;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use memory::MemoryLocalStore;
pub use session::SessionLocalStore;

/// Storage keys.
pub mod keys {
    /// Anonymous shopper session id (`session_<millis>_<suffix>`).
    pub const SESSION_ID: &str = "session_id";
    /// Username of the signed-in mock user.
    pub const ACTIVE_USER: &str = "mock_user";
    /// JSON mock profile.
    pub const PROFILE: &str = "mock_profile";
    /// JSON array of account addresses.
    pub const ADDRESSES: &str = "mock_addresses";
    /// JSON array of account phone numbers.
    pub const PHONES: &str = "mock_phones";
}

/// Errors from local persistence.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage scoped to one browser.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    async fn remove(&self, key: &str) -> Result<(), LocalStoreError>;
}

/// Outcome of reading a JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stored<T> {
    /// Nothing stored under the key.
    Missing,
    /// Stored text that does not parse as `T`.
    Unreadable,
    Present(T),
}

impl<T> Stored<T> {
    /// The parsed value, if any.
    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Missing | Self::Unreadable => None,
        }
    }
}

/// Read and parse a JSON value.
///
/// Storage and parse failures are logged and reported as
/// [`Stored::Unreadable`]; callers decide whether to fall back to defaults.
pub async fn read_json<T: DeserializeOwned>(store: &dyn LocalStore, key: &str) -> Stored<T> {
    match store.get(key).await {
        Ok(None) => Stored::Missing,
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Stored::Present(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unparsable local value");
                Stored::Unreadable
            }
        },
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read local value");
            Stored::Unreadable
        }
    }
}

/// Serialize `value` as JSON and store it.
///
/// # Errors
///
/// Returns `LocalStoreError` if serialization or the write fails.
pub async fn write_json<T: Serialize + Sync>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> Result<(), LocalStoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quartermaster_core::Profile;

    use super::*;

    #[tokio::test]
    async fn test_read_json_states() {
        let store = MemoryLocalStore::new();

        assert_eq!(
            read_json::<Profile>(&store, keys::PROFILE).await,
            Stored::Missing
        );

        store.set(keys::PROFILE, "{not json").await.unwrap();
        assert_eq!(
            read_json::<Profile>(&store, keys::PROFILE).await,
            Stored::Unreadable
        );

        write_json(&store, keys::PROFILE, &Profile::demo())
            .await
            .unwrap();
        assert_eq!(
            read_json::<Profile>(&store, keys::PROFILE).await,
            Stored::Present(Profile::demo())
        );
    }

    #[tokio::test]
    async fn test_profile_stored_with_camel_case_keys() {
        let store = MemoryLocalStore::new();
        write_json(&store, keys::PROFILE, &Profile::demo())
            .await
            .unwrap();
        let raw = store.get(keys::PROFILE).await.unwrap().unwrap();
        assert!(raw.contains("\"securityQuestion\""));
    }
}
