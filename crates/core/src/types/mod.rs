//! Core types for Quartermaster.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod email;
pub mod id;
pub mod page;
pub mod price;
pub mod profile;
pub mod session;

pub use account::{Address, AddressPatch, Phone, PhonePatch, default_addresses, default_phones};
pub use cart::{CartItem, CartSummary, CheckoutSummary, NewCartItem, Quantity, QuantityError};
pub use catalog::{Category, Product, ProductFilter};
pub use email::{Email, EmailError};
pub use id::*;
pub use page::{Page, ParsePageError};
pub use price::{Allotment, Price};
pub use profile::{PasswordRules, Profile, ProfilePatch};
pub use session::SessionId;
