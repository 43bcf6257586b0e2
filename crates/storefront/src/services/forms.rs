//! Validation for checkout and the sign-in side forms.
//!
//! None of these forms reach a backend: checkout places a demo order and the
//! account request and password reset only show a confirmation.

use serde::Deserialize;
use thiserror::Error;

use quartermaster_core::Email;

/// Form validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Email and confirm email do not match")]
    EmailMismatch,

    #[error("Please enter a valid email address")]
    InvalidEmail,
}

fn require(missing: &mut Vec<&'static str>, label: &'static str, value: &str) {
    if value.trim().is_empty() {
        missing.push(label);
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Shipping methods offered at checkout.
pub const SHIPPING_METHODS: &[&str] = &[
    "Ground - Best Way Standard",
    "Express - 2 Day",
    "Next Day Air",
];

/// Message shown after a demo order.
pub const ORDER_PLACED: &str = "Order placed successfully! (This is a demo)";

/// Order information entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub ext: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub shipping_method: String,
}

impl Default for CheckoutForm {
    /// Prefilled demo order information.
    fn default() -> Self {
        Self {
            first_name: "Karl".to_string(),
            last_name: "Kuester".to_string(),
            email: "kkuester@department.com".to_string(),
            phone: "(847) 897-7443".to_string(),
            ext: "815".to_string(),
            address: "2126 POINT BLVD. UNIT 200, ELGIN IL, 60123-7656".to_string(),
            shipping_method: "Ground - Best Way Standard".to_string(),
        }
    }
}

impl CheckoutForm {
    /// Check required fields. The extension is optional.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingFields` listing every blank required field.
    pub fn validate(&self) -> Result<(), FormError> {
        let mut missing = Vec::new();
        require(&mut missing, "First Name", &self.first_name);
        require(&mut missing, "Last Name", &self.last_name);
        require(&mut missing, "Email", &self.email);
        require(&mut missing, "Phone", &self.phone);
        require(&mut missing, "Address", &self.address);
        require(&mut missing, "Shipping Method", &self.shipping_method);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormError::MissingFields(missing))
        }
    }
}

// =============================================================================
// Request account
// =============================================================================

/// New account request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub confirm_email: String,
}

impl AccountRequest {
    /// Names and a matching, valid email are required. Branch is optional.
    ///
    /// # Errors
    ///
    /// Returns the first `FormError` found.
    pub fn validate(&self) -> Result<(), FormError> {
        let mut missing = Vec::new();
        require(&mut missing, "First Name", &self.first_name);
        require(&mut missing, "Last Name", &self.last_name);
        require(&mut missing, "Email Address", &self.email);
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }
        if self.email.trim() != self.confirm_email.trim() {
            return Err(FormError::EmailMismatch);
        }
        Email::parse(&self.email).map_err(|_| FormError::InvalidEmail)?;
        Ok(())
    }
}

// =============================================================================
// Forgot password
// =============================================================================

/// Password reset request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordReset {
    #[serde(default)]
    pub username: String,
}

impl PasswordReset {
    /// # Errors
    ///
    /// Returns `FormError::MissingFields` if the user name is blank.
    pub fn validate(&self) -> Result<(), FormError> {
        let mut missing = Vec::new();
        require(&mut missing, "User Name", &self.username);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormError::MissingFields(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefilled_checkout_is_valid() {
        assert_eq!(CheckoutForm::default().validate(), Ok(()));
    }

    #[test]
    fn test_checkout_lists_missing_fields() {
        let form = CheckoutForm {
            first_name: " ".to_string(),
            phone: String::new(),
            ext: String::new(),
            ..CheckoutForm::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err,
            FormError::MissingFields(vec!["First Name", "Phone"])
        );
        assert_eq!(err.to_string(), "Please fill in: First Name, Phone");
    }

    #[test]
    fn test_account_request() {
        let mut request = AccountRequest {
            first_name: "Karl".to_string(),
            last_name: "Kuester".to_string(),
            branch: String::new(),
            email: "kk@example.com".to_string(),
            confirm_email: "kk@example.com".to_string(),
        };
        assert_eq!(request.validate(), Ok(()));

        request.confirm_email = "kk@example.org".to_string();
        assert_eq!(request.validate(), Err(FormError::EmailMismatch));

        request.email = "kk".to_string();
        request.confirm_email = "kk".to_string();
        assert_eq!(request.validate(), Err(FormError::InvalidEmail));

        request.last_name = String::new();
        assert!(matches!(
            request.validate(),
            Err(FormError::MissingFields(fields)) if fields == vec!["Last Name"]
        ));
    }

    #[test]
    fn test_password_reset_requires_username() {
        assert!(PasswordReset::default().validate().is_err());
        assert!(
            PasswordReset {
                username: "demo".to_string()
            }
            .validate()
            .is_ok()
        );
    }
}
