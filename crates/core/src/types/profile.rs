//! Mock shopper profile.
//!
//! There is no identity provider behind the storefront. A single profile is
//! kept per browser and used to demonstrate sign-in and account pages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The locally persisted stand-in for a user account.
///
/// Serialized with camelCase keys. `Debug` redacts the password and the
/// security answer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_answer: Option<String>,
}

impl Profile {
    pub const DEMO_USERNAME: &'static str = "demo";
    pub const DEMO_EMAIL: &'static str = "demo@example.com";
    pub const DEMO_PASSWORD: &'static str = "Password123!";

    /// The profile every browser starts with.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            username: Self::DEMO_USERNAME.to_owned(),
            email: Self::DEMO_EMAIL.to_owned(),
            password: Self::DEMO_PASSWORD.to_owned(),
            security_question: Some(String::new()),
            security_answer: Some(String::new()),
        }
    }

    /// Shallow merge: every field present in `patch` replaces ours.
    #[must_use]
    pub fn merged(mut self, patch: ProfilePatch) -> Self {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if patch.security_question.is_some() {
            self.security_question = patch.security_question;
        }
        if patch.security_answer.is_some() {
            self.security_answer = patch.security_answer;
        }
        self
    }

    /// Exact username and password comparison.
    #[must_use]
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::demo()
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("security_question", &self.security_question)
            .field("security_answer", &"[REDACTED]")
            .finish()
    }
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
}

impl ProfilePatch {
    #[must_use]
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }
}

/// Which password requirements a candidate satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PasswordRules {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub special: bool,
    pub min_length: bool,
}

impl PasswordRules {
    pub const MIN_LENGTH: usize = 8;

    #[must_use]
    pub fn check(password: &str) -> Self {
        Self {
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| !c.is_ascii_alphanumeric()),
            min_length: password.chars().count() >= Self::MIN_LENGTH,
        }
    }

    #[must_use]
    pub const fn all_met(&self) -> bool {
        self.lowercase && self.uppercase && self.digit && self.special && self.min_length
    }
}
