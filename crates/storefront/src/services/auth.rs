//! Credential verification.
//!
//! The storefront has no identity provider. The provided verifier compares
//! the submitted pair against the mock profile persisted for this browser;
//! a real provider can be plugged in behind the same trait.

use async_trait::async_trait;
use quartermaster_core::Profile;

use crate::local::{LocalStore, Stored, keys, read_json};

/// Checks a username/password pair.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns the matching profile, or `None` when the pair is rejected.
    async fn verify(
        &self,
        local: &dyn LocalStore,
        username: &str,
        password: &str,
    ) -> Option<Profile>;
}

/// Verifies against the profile stored under [`keys::PROFILE`].
///
/// A missing or unparsable stored profile rejects every pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProfileVerifier;

#[async_trait]
impl CredentialVerifier for LocalProfileVerifier {
    async fn verify(
        &self,
        local: &dyn LocalStore,
        username: &str,
        password: &str,
    ) -> Option<Profile> {
        match read_json::<Profile>(local, keys::PROFILE).await {
            Stored::Present(profile) if profile.matches_credentials(username, password) => {
                Some(profile)
            }
            Stored::Present(_) => None,
            Stored::Missing | Stored::Unreadable => {
                tracing::debug!("No readable profile to verify against");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::local::{MemoryLocalStore, write_json};

    #[tokio::test]
    async fn test_verifies_against_stored_profile() {
        let local = MemoryLocalStore::new();
        write_json(&local, keys::PROFILE, &Profile::demo())
            .await
            .unwrap();

        let verifier = LocalProfileVerifier;
        assert!(
            verifier
                .verify(&local, "demo", "Password123!")
                .await
                .is_some()
        );
        assert!(verifier.verify(&local, "demo", "nope").await.is_none());
        assert!(
            verifier
                .verify(&local, "someone", "Password123!")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_rejects_without_profile() {
        let local = MemoryLocalStore::new();
        assert!(
            LocalProfileVerifier
                .verify(&local, "demo", "Password123!")
                .await
                .is_none()
        );

        local.set(keys::PROFILE, "garbage").await.unwrap();
        assert!(
            LocalProfileVerifier
                .verify(&local, "demo", "Password123!")
                .await
                .is_none()
        );
    }
}
