//! Domain models for the storefront.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::CartEntry;
pub use order::{Address, CharityDonation, Country, Order, PaymentDetails};
pub use product::{NewProduct, Product, ProductUpdate};
pub use session::keys as session_keys;
pub use user::{ProfileUpdate, User};
