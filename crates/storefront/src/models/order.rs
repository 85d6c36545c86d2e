//! Order and checkout domain types.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use nextshop_core::{OrderId, OrderStatus, Price, UserId};

use super::CartEntry;

/// Destination country offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Country {
    #[default]
    US,
    CA,
    UK,
}

impl Country {
    /// Human-readable country name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::US => "United States",
            Self::CA => "Canada",
            Self::UK => "United Kingdom",
        }
    }
}

impl core::str::FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Self::US),
            "CA" => Ok(Self::CA),
            "UK" | "GB" => Ok(Self::UK),
            other => Err(format!("unsupported country: {other}")),
        }
    }
}

/// Shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: Country,
}

impl Address {
    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} {}, {}",
            self.street,
            self.city,
            self.state,
            self.zip_code,
            self.country.name()
        )
    }
}

/// Card details typed into the payment step.
///
/// The card number and CVV never leave checkout; orders only keep
/// [`PaymentDetails::masked`].
#[derive(Debug, Clone)]
pub struct PaymentDetails {
    pub cardholder_name: String,
    pub card_number: SecretString,
    pub expiry_date: String,
    pub cvv: SecretString,
}

impl PaymentDetails {
    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.cardholder_name.trim().is_empty() {
            missing.push("cardholder name");
        }
        if self.card_number.expose_secret().trim().is_empty() {
            missing.push("card number");
        }
        if self.expiry_date.trim().is_empty() {
            missing.push("expiry date");
        }
        if self.cvv.expose_secret().trim().is_empty() {
            missing.push("cvv");
        }
        missing
    }

    /// Card descriptor safe to store: `**** **** **** 4242`.
    #[must_use]
    pub fn masked(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .expose_secret()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        let last_four: String = digits.iter().skip(digits.len().saturating_sub(4)).collect();
        format!("**** **** **** {last_four}")
    }
}

/// Optional donation added at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CharityDonation {
    #[default]
    None,
    /// $2 - Clean Water
    CleanWater,
    /// $5 - Education
    Education,
    /// $10 - Environmental
    Environmental,
}

impl CharityDonation {
    /// Every option in menu order.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::CleanWater,
        Self::Education,
        Self::Environmental,
    ];

    /// Donation amount in dollars.
    #[must_use]
    pub fn amount(self) -> Decimal {
        match self {
            Self::None => Decimal::ZERO,
            Self::CleanWater => Decimal::new(2, 0),
            Self::Education => Decimal::new(5, 0),
            Self::Environmental => Decimal::new(10, 0),
        }
    }

    /// Look up the option matching a whole-dollar amount.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.amount() == amount)
    }
}

/// A placed order. Created once at checkout and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<CartEntry>,
    pub subtotal: Price,
    /// Carbon offset charged, zero when declined.
    pub carbon_offset: Decimal,
    pub charity_donation: Decimal,
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_address: Address,
    /// Masked card descriptor.
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl Order {
    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|entry| entry.quantity).sum()
    }
}
