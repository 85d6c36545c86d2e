//! NextShop Core - Shared types library.
//!
//! This crate provides the common types used across all NextShop components:
//! - `storefront` - Catalog, cart, session, checkout and assistant services
//! - `cli` - Command-line driver for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no clocks, no randomness.
//! This keeps it lightweight and usable from any layer.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
