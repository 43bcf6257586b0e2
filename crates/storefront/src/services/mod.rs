//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Pluggable username/password verification
//! - `account` - Mock address/phone book and profile change flows
//! - `forms` - Validation for the sign-in side forms and checkout

pub mod account;
pub mod auth;
pub mod forms;
