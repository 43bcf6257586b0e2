//! Mock account book and profile change flows for the account page.
//!
//! Addresses and phones are plain JSON lists in local persistence, seeded
//! with defaults the first time they are read. Profile changes go through
//! [`AppStore::try_update_profile`] so the cached profile and display name
//! stay in sync and a failed save is reported.

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use quartermaster_core::{
    Address, AddressPatch, Email, EmailError, PasswordRules, Phone, PhonePatch, ProfilePatch,
    default_addresses, default_phones,
};

use crate::local::{LocalStore, LocalStoreError, Stored, keys, read_json, write_json};
use crate::store::AppStore;

/// Errors from account page actions. The message is shown to the shopper.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("No profile")]
    NoProfile,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("New password and confirm do not match")]
    PasswordMismatch,

    #[error("Password does not meet requirements")]
    WeakPassword(PasswordRules),

    #[error("Current email does not match")]
    WrongEmail,

    #[error("New email and confirm do not match")]
    EmailMismatch,

    #[error("New email is not a valid address")]
    InvalidEmail(#[from] EmailError),

    #[error("Could not save changes")]
    Storage(#[from] LocalStoreError),
}

impl AccountError {
    /// Short code used in redirect query strings.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoProfile => "no_profile",
            Self::WrongPassword => "wrong_password",
            Self::PasswordMismatch => "password_mismatch",
            Self::WeakPassword(_) => "weak_password",
            Self::WrongEmail => "wrong_email",
            Self::EmailMismatch => "email_mismatch",
            Self::InvalidEmail(_) => "invalid_email",
            Self::Storage(_) => "storage",
        }
    }

    /// Message for a code produced by [`AccountError::code`].
    #[must_use]
    pub fn message_for_code(code: &str) -> Option<&'static str> {
        Some(match code {
            "no_profile" => "No profile",
            "wrong_password" => "Current password is incorrect",
            "password_mismatch" => "New password and confirm do not match",
            "weak_password" => "Password does not meet requirements",
            "wrong_email" => "Current email does not match",
            "email_mismatch" => "New email and confirm do not match",
            "invalid_email" => "New email is not a valid address",
            "storage" => "Could not save changes",
            _ => return None,
        })
    }
}

// =============================================================================
// Profile changes
// =============================================================================

/// Change password form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordChange {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Change email form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailChange {
    #[serde(default)]
    pub current_email: String,
    #[serde(default)]
    pub new_email: String,
    #[serde(default)]
    pub confirm_email: String,
}

/// Security question form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityChange {
    #[serde(default)]
    pub security_question: String,
    #[serde(default)]
    pub security_answer: String,
}

/// Security questions offered on the account page, as (value, label).
pub const SECURITY_QUESTIONS: &[(&str, &str)] = &[
    ("mother_maiden", "What is your mother's maiden name?"),
    ("first_pet", "What was the name of your first pet?"),
    ("first_school", "What was your first school?"),
];

/// Change the mock profile's password.
///
/// # Errors
///
/// Returns an `AccountError` naming the first failed check, or
/// `AccountError::Storage` if the profile cannot be saved. The stored and
/// cached profile are left untouched on error.
#[instrument(skip_all)]
pub async fn change_password(store: &mut AppStore, form: &PasswordChange) -> Result<(), AccountError> {
    let profile = store.profile().ok_or(AccountError::NoProfile)?;
    if form.current_password != profile.password {
        return Err(AccountError::WrongPassword);
    }
    if form.new_password != form.confirm_password {
        return Err(AccountError::PasswordMismatch);
    }
    let rules = PasswordRules::check(&form.new_password);
    if !rules.all_met() {
        return Err(AccountError::WeakPassword(rules));
    }

    store
        .try_update_profile(ProfilePatch::password(form.new_password.clone()))
        .await?;
    tracing::info!("Password changed");
    Ok(())
}

/// Change the mock profile's email address.
///
/// # Errors
///
/// Returns an `AccountError` naming the first failed check, or
/// `AccountError::Storage` if the profile cannot be saved.
#[instrument(skip_all)]
pub async fn change_email(store: &mut AppStore, form: &EmailChange) -> Result<(), AccountError> {
    let profile = store.profile().ok_or(AccountError::NoProfile)?;
    if form.current_email.trim() != profile.email {
        return Err(AccountError::WrongEmail);
    }
    if form.new_email.trim().is_empty() || form.new_email.trim() != form.confirm_email.trim() {
        return Err(AccountError::EmailMismatch);
    }
    let email = Email::parse(&form.new_email)?;

    store
        .try_update_profile(ProfilePatch::email(email.into_inner()))
        .await?;
    tracing::info!("Email changed");
    Ok(())
}

/// Replace the security question and answer.
///
/// # Errors
///
/// Returns `AccountError::Storage` if the profile cannot be saved.
#[instrument(skip_all)]
pub async fn change_security_question(
    store: &mut AppStore,
    form: &SecurityChange,
) -> Result<(), AccountError> {
    store
        .try_update_profile(ProfilePatch {
            security_question: Some(form.security_question.clone()),
            security_answer: Some(form.security_answer.clone()),
            ..ProfilePatch::default()
        })
        .await?;
    tracing::info!("Security question changed");
    Ok(())
}

// =============================================================================
// Address and phone book
// =============================================================================

/// Address and phone lists for one browser.
pub struct AccountBook<'a> {
    local: &'a dyn LocalStore,
}

impl<'a> AccountBook<'a> {
    #[must_use]
    pub const fn new(local: &'a dyn LocalStore) -> Self {
        Self { local }
    }

    /// Stored addresses, seeding the defaults on first read. An unreadable
    /// list shows as empty and is left in place.
    pub async fn addresses(&self) -> Vec<Address> {
        load_list(self.local, keys::ADDRESSES, default_addresses).await
    }

    /// Insert a blank shipping address at the top of the list.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the list cannot be saved.
    pub async fn add_address(&self) -> Result<Address, AccountError> {
        let mut addresses = self.addresses().await;
        let address = Address::blank(next_id(addresses.iter().map(|a| a.id)));
        addresses.insert(0, address.clone());
        write_json(self.local, keys::ADDRESSES, &addresses).await?;
        Ok(address)
    }

    /// Patch the address with `id`. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the list cannot be saved.
    pub async fn update_address(&self, id: i64, patch: AddressPatch) -> Result<(), AccountError> {
        let addresses: Vec<Address> = self
            .addresses()
            .await
            .into_iter()
            .map(|a| if a.id == id { a.patched(patch.clone()) } else { a })
            .collect();
        write_json(self.local, keys::ADDRESSES, &addresses).await?;
        Ok(())
    }

    /// Delete the address with `id`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the list cannot be saved.
    pub async fn delete_address(&self, id: i64) -> Result<(), AccountError> {
        let mut addresses = self.addresses().await;
        addresses.retain(|a| a.id != id);
        write_json(self.local, keys::ADDRESSES, &addresses).await?;
        Ok(())
    }

    /// Stored phones, seeding the defaults on first read.
    pub async fn phones(&self) -> Vec<Phone> {
        load_list(self.local, keys::PHONES, default_phones).await
    }

    /// Insert a blank mobile number at the top of the list.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the list cannot be saved.
    pub async fn add_phone(&self) -> Result<Phone, AccountError> {
        let mut phones = self.phones().await;
        let phone = Phone::blank(next_id(phones.iter().map(|p| p.id)));
        phones.insert(0, phone.clone());
        write_json(self.local, keys::PHONES, &phones).await?;
        Ok(phone)
    }

    /// Patch the phone with `id`. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the list cannot be saved.
    pub async fn update_phone(&self, id: i64, patch: PhonePatch) -> Result<(), AccountError> {
        let phones: Vec<Phone> = self
            .phones()
            .await
            .into_iter()
            .map(|p| if p.id == id { p.patched(patch.clone()) } else { p })
            .collect();
        write_json(self.local, keys::PHONES, &phones).await?;
        Ok(())
    }

    /// Delete the phone with `id`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the list cannot be saved.
    pub async fn delete_phone(&self, id: i64) -> Result<(), AccountError> {
        let mut phones = self.phones().await;
        phones.retain(|p| p.id != id);
        write_json(self.local, keys::PHONES, &phones).await?;
        Ok(())
    }
}

async fn load_list<T>(local: &dyn LocalStore, key: &str, defaults: fn() -> Vec<T>) -> Vec<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Sync,
{
    match read_json::<Vec<T>>(local, key).await {
        Stored::Present(list) => list,
        Stored::Unreadable => Vec::new(),
        Stored::Missing => {
            let list = defaults();
            if let Err(e) = write_json(local, key, &list).await {
                tracing::warn!(key, error = %e, "Failed to persist default list");
            }
            list
        }
    }
}

/// Current time in millis, bumped past any existing id.
fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    existing.max().map_or(now, |max| now.max(max.saturating_add(1)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use quartermaster_core::{Price, Profile};

    use super::*;
    use crate::db::{MemoryCarts, MemoryCatalog};
    use crate::local::MemoryLocalStore;
    use crate::services::auth::LocalProfileVerifier;
    use crate::store::{CartLocks, StoreDeps};

    /// Local store whose profile writes fail once `failing` is set.
    #[derive(Clone, Default)]
    struct ProfileWriteFails {
        inner: MemoryLocalStore,
        failing: Arc<AtomicBool>,
    }

    #[async_trait]
    impl LocalStore for ProfileWriteFails {
        async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
            if key == keys::PROFILE && self.failing.load(Ordering::SeqCst) {
                let err = serde_json::from_str::<u8>("full").unwrap_err();
                return Err(LocalStoreError::Serialization(err));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
            self.inner.remove(key).await
        }
    }

    async fn store_with(local: &MemoryLocalStore) -> AppStore {
        store_on(Arc::new(local.clone())).await
    }

    async fn store_on(local: Arc<dyn LocalStore>) -> AppStore {
        let catalog = Arc::new(MemoryCatalog::default());
        AppStore::init(StoreDeps {
            catalog: catalog.clone(),
            carts: Arc::new(MemoryCarts::new(catalog)),
            local,
            verifier: Arc::new(LocalProfileVerifier),
            cart_locks: CartLocks::new(),
            allotment: Price::ZERO,
        })
        .await
    }

    fn password_form(current: &str, new: &str, confirm: &str) -> PasswordChange {
        PasswordChange {
            current_password: current.to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_change_password() {
        let local = MemoryLocalStore::new();
        let mut store = store_with(&local).await;

        change_password(
            &mut store,
            &password_form("Password123!", "Newpass1$", "Newpass1$"),
        )
        .await
        .unwrap();

        assert!(store.login("demo", "Newpass1$").await);
    }

    #[tokio::test]
    async fn test_change_password_rejections_leave_profile_intact() {
        let local = MemoryLocalStore::new();
        let mut store = store_with(&local).await;

        let cases = [
            (password_form("wrong", "Newpass1$", "Newpass1$"), "wrong_password"),
            (password_form("Password123!", "Newpass1$", "Other1$x"), "password_mismatch"),
            (password_form("Password123!", "weakpass", "weakpass"), "weak_password"),
        ];
        for (form, code) in cases {
            let err = change_password(&mut store, &form).await.unwrap_err();
            assert_eq!(err.code(), code);
        }

        let stored: Profile =
            serde_json::from_str(&local.get(keys::PROFILE).await.unwrap().unwrap()).unwrap();
        assert_eq!(stored.password, Profile::DEMO_PASSWORD);
    }

    #[tokio::test]
    async fn test_change_email() {
        let local = MemoryLocalStore::new();
        let mut store = store_with(&local).await;

        let err = change_email(
            &mut store,
            &EmailChange {
                current_email: "other@example.com".into(),
                new_email: "kk@example.com".into(),
                confirm_email: "kk@example.com".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccountError::WrongEmail));

        let err = change_email(
            &mut store,
            &EmailChange {
                current_email: "demo@example.com".into(),
                new_email: "not-an-email".into(),
                confirm_email: "not-an-email".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccountError::InvalidEmail(_)));

        change_email(
            &mut store,
            &EmailChange {
                current_email: "demo@example.com".into(),
                new_email: "kk@example.com".into(),
                confirm_email: "kk@example.com".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(store.profile().unwrap().email, "kk@example.com");
    }

    #[tokio::test]
    async fn test_change_security_question() {
        let local = MemoryLocalStore::new();
        let mut store = store_with(&local).await;

        change_security_question(
            &mut store,
            &SecurityChange {
                security_question: "first_pet".into(),
                security_answer: "Rex".into(),
            },
        )
        .await
        .unwrap();

        let profile = store.profile().unwrap();
        assert_eq!(profile.security_question.as_deref(), Some("first_pet"));
        assert_eq!(profile.security_answer.as_deref(), Some("Rex"));
    }

    #[tokio::test]
    async fn test_profile_changes_report_failed_save() {
        let local = ProfileWriteFails::default();
        let mut store = store_on(Arc::new(local.clone())).await;
        local.failing.store(true, Ordering::SeqCst);

        let err = change_password(
            &mut store,
            &password_form("Password123!", "Newpass1!x", "Newpass1!x"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccountError::Storage(_)));
        assert_eq!(err.code(), "storage");
        assert_eq!(store.profile().unwrap().password, Profile::DEMO_PASSWORD);

        let err = change_email(
            &mut store,
            &EmailChange {
                current_email: "demo@example.com".into(),
                new_email: "kk@example.com".into(),
                confirm_email: "kk@example.com".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccountError::Storage(_)));
        assert_eq!(store.profile().unwrap().email, "demo@example.com");

        let err = change_security_question(
            &mut store,
            &SecurityChange {
                security_question: "first_pet".into(),
                security_answer: "Rex".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccountError::Storage(_)));
        assert_eq!(store.profile().unwrap().security_answer.as_deref(), Some(""));

        // Next request sees the old password still in place.
        local.failing.store(false, Ordering::SeqCst);
        let mut next = store_on(Arc::new(local.clone())).await;
        assert!(!next.login(Profile::DEMO_USERNAME, "Newpass1!x").await);
        assert!(next.login(Profile::DEMO_USERNAME, Profile::DEMO_PASSWORD).await);
    }

    #[tokio::test]
    async fn test_address_book_seeds_defaults() {
        let local = MemoryLocalStore::new();
        let book = AccountBook::new(&local);

        let addresses = book.addresses().await;
        assert_eq!(addresses, default_addresses());
        assert!(local.get(keys::ADDRESSES).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_address_crud() {
        let local = MemoryLocalStore::new();
        let book = AccountBook::new(&local);

        let added = book.add_address().await.unwrap();
        let addresses = book.addresses().await;
        assert_eq!(addresses.len(), 3);
        assert_eq!(addresses[0], added);
        assert_eq!(added.kind, "Shipping");

        book.update_address(
            added.id,
            AddressPatch {
                street: Some("1 MAIN ST".into()),
                ..AddressPatch::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(book.addresses().await[0].street, "1 MAIN ST");

        book.delete_address(1).await.unwrap();
        let ids: Vec<i64> = book.addresses().await.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![added.id, 2]);
    }

    #[tokio::test]
    async fn test_phone_crud() {
        let local = MemoryLocalStore::new();
        let book = AccountBook::new(&local);

        let first = book.add_phone().await.unwrap();
        let second = book.add_phone().await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(book.phones().await.len(), 3);

        book.update_phone(
            second.id,
            PhonePatch {
                phone: Some("(555) 010-0000".into()),
                kind: Some("Land".into()),
            },
        )
        .await
        .unwrap();
        book.delete_phone(first.id).await.unwrap();

        let phones = book.phones().await;
        assert_eq!(phones.len(), 2);
        assert_eq!(phones[0].phone, "(555) 010-0000");
    }

    #[tokio::test]
    async fn test_unreadable_list_is_left_alone() {
        let local = MemoryLocalStore::new();
        local.set(keys::PHONES, "[{").await.unwrap();
        let book = AccountBook::new(&local);

        assert!(book.phones().await.is_empty());
        assert_eq!(local.get(keys::PHONES).await.unwrap().as_deref(), Some("[{"));
    }

    #[test]
    fn test_codes_round_trip_to_messages() {
        let errors = [
            AccountError::NoProfile,
            AccountError::WrongPassword,
            AccountError::PasswordMismatch,
            AccountError::WeakPassword(PasswordRules::check("")),
            AccountError::WrongEmail,
            AccountError::EmailMismatch,
            AccountError::InvalidEmail(EmailError::Empty),
        ];
        for err in errors {
            assert_eq!(
                AccountError::message_for_code(err.code()),
                Some(err.to_string().as_str())
            );
        }
        assert_eq!(AccountError::message_for_code("bogus"), None);
    }
}
