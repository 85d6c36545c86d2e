//! Mock checkout.
//!
//! No payment is processed. Placing an order validates the form, waits out a
//! simulated processing delay, records the order and empties the cart.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use nextshop_core::{OrderStatus, Price};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::models::{Address, CharityDonation, Order, PaymentDetails, User};
use crate::services::cart::Cart;
use crate::services::orders::OrderHistory;

/// Errors that stop an order from being placed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Please sign in to place an order")]
    NotSignedIn,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Missing shipping details: {}", .0.join(", "))]
    MissingAddressFields(Vec<&'static str>),

    #[error("Missing payment details: {}", .0.join(", "))]
    MissingPaymentFields(Vec<&'static str>),

    /// Cart lines whose products were removed from the catalog.
    #[error("No longer available: {}", .0.join(", "))]
    UnavailableProducts(Vec<String>),
}

/// Everything the checkout form collects.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub address: Address,
    pub payment: PaymentDetails,
    pub carbon_offset: bool,
    pub donation: CharityDonation,
}

impl CheckoutRequest {
    /// A request with the form's initial choices: carbon offset on and a $5
    /// education donation.
    #[must_use]
    pub const fn new(address: Address, payment: PaymentDetails) -> Self {
        Self {
            address,
            payment,
            carbon_offset: true,
            donation: CharityDonation::Education,
        }
    }

    #[must_use]
    pub const fn with_carbon_offset(mut self, carbon_offset: bool) -> Self {
        self.carbon_offset = carbon_offset;
        self
    }

    #[must_use]
    pub const fn with_donation(mut self, donation: CharityDonation) -> Self {
        self.donation = donation;
        self
    }
}

/// Breakdown shown in the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuote {
    pub subtotal: Price,
    /// Carbon offset charged, zero when declined.
    pub carbon_offset: Decimal,
    pub donation: Decimal,
    pub total: Price,
}

/// Subtotal plus the optional add-ons.
#[must_use]
pub fn order_total(subtotal: Price, carbon_offset: Decimal, donation: CharityDonation) -> Price {
    Price::new(
        subtotal.amount + carbon_offset + donation.amount(),
        subtotal.currency_code,
    )
}

/// Order placement with the configured surcharge and delay.
#[derive(Debug, Clone)]
pub struct Checkout {
    carbon_offset: Decimal,
    order_delay: Duration,
}

impl Checkout {
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            carbon_offset: config.carbon_offset,
            order_delay: config.order_delay,
        }
    }

    /// The configured carbon offset surcharge.
    #[must_use]
    pub const fn carbon_offset_cost(&self) -> Decimal {
        self.carbon_offset
    }

    /// Price the cart with the chosen add-ons.
    #[must_use]
    pub fn quote(&self, cart: &Cart, carbon_offset: bool, donation: CharityDonation) -> OrderQuote {
        let subtotal = cart.total_price();
        let carbon_offset = if carbon_offset {
            self.carbon_offset
        } else {
            Decimal::ZERO
        };
        OrderQuote {
            subtotal,
            carbon_offset,
            donation: donation.amount(),
            total: order_total(subtotal, carbon_offset, donation),
        }
    }

    /// Place an order for the cart contents.
    ///
    /// On success the order is appended to `history` and the cart is
    /// cleared. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when the user is not signed in, the cart is
    /// empty, form fields are missing, or a cart line refers to a product
    /// that is no longer in the catalog.
    #[instrument(skip_all, fields(items = cart.total_items()))]
    pub async fn place_order(
        &self,
        user: Option<&User>,
        cart: &mut Cart,
        catalog: &Catalog,
        history: &mut OrderHistory,
        request: CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        let user = user.ok_or(CheckoutError::NotSignedIn)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let missing = request.address.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingAddressFields(missing));
        }
        let missing = request.payment.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingPaymentFields(missing));
        }

        let unavailable: Vec<String> = cart
            .entries()
            .iter()
            .filter(|entry| catalog.get(entry.product.id).is_none())
            .map(|entry| entry.product.name.clone())
            .collect();
        if !unavailable.is_empty() {
            tracing::warn!(?unavailable, "Cart holds products removed from the catalog");
            return Err(CheckoutError::UnavailableProducts(unavailable));
        }

        let quote = self.quote(cart, request.carbon_offset, request.donation);
        tokio::time::sleep(self.order_delay).await;

        let created_at = Utc::now();
        let millis = created_at.timestamp_millis();
        let order = Order {
            id: history.next_id(millis),
            user_id: user.id,
            items: cart.entries().to_vec(),
            subtotal: quote.subtotal,
            carbon_offset: quote.carbon_offset,
            charity_donation: quote.donation,
            total: quote.total,
            status: OrderStatus::Pending,
            shipping_address: request.address,
            payment_method: request.payment.masked(),
            created_at,
            tracking_number: Some(format!("NS{millis}")),
        };

        history.record(order.clone());
        cart.clear();
        cart.close();
        tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::models::Country;
    use nextshop_core::{Email, ProductId, UserId, UserRole};

    fn user() -> User {
        User {
            id: UserId::new(1),
            name: "John Doe".to_string(),
            email: Email::parse("john@example.com").unwrap(),
            avatar: None,
            role: UserRole::Customer,
            created_at: Utc::now(),
            two_factor_enabled: false,
            carbon_offset: Decimal::ZERO,
        }
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest::new(
            Address {
                street: "1 Market St".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip_code: "94105".to_string(),
                country: Country::US,
            },
            PaymentDetails {
                cardholder_name: "John Doe".to_string(),
                card_number: SecretString::from("4242 4242 4242 4242"),
                expiry_date: "12/29".to_string(),
                cvv: SecretString::from("123"),
            },
        )
    }

    fn checkout() -> Checkout {
        Checkout::new(&StorefrontConfig::default().without_delays())
    }

    #[test]
    fn test_order_total_adds_extras() {
        let total = order_total(
            Price::usd(Decimal::new(100, 0)),
            Decimal::new(250, 2),
            CharityDonation::Education,
        );
        assert_eq!(total.amount, Decimal::new(10750, 2));
    }

    #[test]
    fn test_quote_without_extras() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        cart.add(catalog.get(ProductId::new(6)).unwrap(), 2);
        let quote = checkout().quote(&cart, false, CharityDonation::None);
        assert_eq!(quote.carbon_offset, Decimal::ZERO);
        assert_eq!(quote.total.amount, Decimal::new(48, 0));
    }

    #[tokio::test]
    async fn test_place_order() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        let mut history = OrderHistory::new();
        cart.add(catalog.get(ProductId::new(4)).unwrap(), 2);
        cart.open();

        let order = checkout()
            .place_order(Some(&user()), &mut cart, &catalog, &mut history, request())
            .await
            .unwrap();

        // 2 * 45 + 2.50 + 5
        assert_eq!(order.total.amount, Decimal::new(9750, 2));
        assert_eq!(order.subtotal.amount, Decimal::new(90, 0));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, "**** **** **** 4242");
        assert!(order.tracking_number.as_deref().unwrap().starts_with("NS"));
        assert_eq!(order.item_count(), 2);
        assert!(cart.is_empty());
        assert!(!cart.is_open());
        assert_eq!(history.orders(), std::slice::from_ref(&order));
    }

    #[tokio::test]
    async fn test_requires_user_and_items() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        let mut history = OrderHistory::new();
        let checkout = checkout();

        let err = checkout
            .place_order(None, &mut cart, &catalog, &mut history, request())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::NotSignedIn);

        let err = checkout
            .place_order(Some(&user()), &mut cart, &catalog, &mut history, request())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[tokio::test]
    async fn test_missing_fields_leave_cart_alone() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        let mut history = OrderHistory::new();
        cart.add(catalog.get(ProductId::new(1)).unwrap(), 1);

        let mut bad = request();
        bad.address.city = String::new();
        bad.payment.cvv = SecretString::from("");

        let err = checkout()
            .place_order(Some(&user()), &mut cart, &catalog, &mut history, bad.clone())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::MissingAddressFields(vec!["city"]));

        bad.address.city = "Oakland".to_string();
        let err = checkout()
            .place_order(Some(&user()), &mut cart, &catalog, &mut history, bad)
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::MissingPaymentFields(vec!["cvv"]));

        assert_eq!(cart.total_items(), 1);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_products_removed_from_catalog() {
        let mut catalog = Catalog::seeded();
        let mut cart = Cart::new();
        let mut history = OrderHistory::new();
        cart.add(catalog.get(ProductId::new(2)).unwrap(), 1);
        cart.add(catalog.get(ProductId::new(3)).unwrap(), 1);
        catalog.remove(ProductId::new(3)).unwrap();

        let err = checkout()
            .place_order(Some(&user()), &mut cart, &catalog, &mut history, request())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CheckoutError::UnavailableProducts(vec!["Minimalist Backpack".to_string()])
        );
        assert_eq!(err.to_string(), "No longer available: Minimalist Backpack");
        assert_eq!(cart.entries().len(), 2);
    }
}
