//! NextShop storefront library.
//!
//! Catalog browsing and filtering, cart, wishlist, a mocked sign-in and
//! checkout flow, and a scripted shopping assistant. [`Storefront`] ties
//! them together as one explicitly owned application state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use catalog::{Catalog, FilterCriteria, PriceRange, Selector, filter_products};
pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use state::Storefront;
