//! Quartermaster Core - Shared domain types.
//!
//! This crate provides the types used across all Quartermaster components:
//! - `storefront` - Public-facing allotment storefront
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Anything that needs a repository or a session lives in the
//! storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Ids, prices, catalog and cart entries, navigation pages,
//!   session ids, the mock profile and account book entries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
