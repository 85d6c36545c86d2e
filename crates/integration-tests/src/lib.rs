//! Integration tests for NextShop.
//!
//! Each test drives a [`Storefront`] end to end through its public API with
//! simulated delays turned off.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nextshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_filtering` - Catalog search and sidebar filters
//! - `storefront_checkout` - Cart, wishlist and order placement
//! - `storefront_session` - Sign-in flows and session persistence

use std::path::PathBuf;

use rust_decimal::Decimal;
use secrecy::SecretString;

use nextshop_core::{Price, ProductId};
use nextshop_storefront::models::{Address, PaymentDetails, Product};
use nextshop_storefront::services::auth::{FileSessionStore, MemorySessionStore};
use nextshop_storefront::services::checkout::CheckoutRequest;
use nextshop_storefront::{Catalog, Storefront, StorefrontConfig};

/// Configuration with every simulated delay set to zero.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::default().without_delays()
}

/// A storefront over the sample catalog with an in-memory session store.
#[must_use]
pub fn storefront() -> Storefront {
    Storefront::new(test_config(), Box::new(MemorySessionStore::new()))
}

/// A storefront over `products` with an in-memory session store.
#[must_use]
pub fn storefront_with(products: Vec<Product>) -> Storefront {
    Storefront::with_catalog(
        test_config(),
        Box::new(MemorySessionStore::new()),
        Catalog::new(products),
    )
}

/// A storefront whose session record lives at `path`.
#[must_use]
pub fn file_backed_storefront(path: PathBuf) -> Storefront {
    let config = StorefrontConfig {
        session_path: path.clone(),
        ..test_config()
    };
    Storefront::new(config, Box::new(FileSessionStore::new(path)))
}

/// A unique session file path under the system temp directory.
#[must_use]
pub fn temp_session_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("nextshop-it-{}", uuid::Uuid::new_v4()))
        .join("session.json")
}

/// A minimal in-stock product.
#[must_use]
pub fn product(id: u64, name: &str, dollars: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::usd(Decimal::new(dollars, 0)),
        original_price: None,
        image: format!("https://example.com/{id}.jpg"),
        images: Vec::new(),
        category: "Test".to_string(),
        description: format!("{name} for testing"),
        rating: Decimal::new(40, 1),
        reviews: 0,
        in_stock: true,
        tags: Vec::new(),
        brand: "TestBrand".to_string(),
        created_at: None,
        updated_at: None,
    }
}

/// A complete checkout form with the form's default add-ons.
#[must_use]
pub fn checkout_request() -> CheckoutRequest {
    CheckoutRequest::new(
        Address {
            street: "123 Main St".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            zip_code: "10001".to_string(),
            ..Address::default()
        },
        PaymentDetails {
            cardholder_name: "John Doe".to_string(),
            card_number: SecretString::from("4242 4242 4242 4242"),
            expiry_date: "12/29".to_string(),
            cvv: SecretString::from("123"),
        },
    )
}
