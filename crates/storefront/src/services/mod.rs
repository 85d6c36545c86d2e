//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Cart ledger and drawer visibility
//! - `wishlist` - Saved products
//! - `auth` - Mock session manager and session record storage
//! - `checkout` - Mock order placement
//! - `orders` - Order history and account summary
//! - `analytics` - Admin sales figures
//! - `assistant` - Scripted shopping assistant

pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod wishlist;
