//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use nextshop_core::{Price, ProductId};

/// A sellable product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Pre-sale price, shown struck through when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Primary image URL.
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub description: String,
    /// Average review score, 0 to 5.
    pub rating: Decimal,
    /// Number of reviews behind `rating`.
    pub reviews: u32,
    pub in_stock: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whole-percent markdown from the original price, if the product is on sale.
    ///
    /// Rounds half away from zero, so $399 -> $299 is a 25% discount.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?.amount;
        if original <= self.price.amount || original.is_zero() {
            return None;
        }
        let percent = ((original - self.price.amount) / original * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        percent.to_u32()
    }

    /// Whether any tag equals `tag` exactly.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Number of filled stars when rendering the rating (floor of the score).
    #[must_use]
    pub fn full_stars(&self) -> u32 {
        self.rating.floor().to_u32().unwrap_or(0)
    }
}

/// Fields supplied when an admin adds a product.
///
/// Rating, review count, id and timestamps are assigned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub description: String,
    pub in_stock: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub brand: String,
}

impl NewProduct {
    /// Split a comma-separated tag field into trimmed, non-empty tags.
    #[must_use]
    pub fn parse_tags(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// A partial product edit. `None` leaves the field untouched.
///
/// `original_price: Some(None)` clears the sale price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Price>,
    #[allow(clippy::option_option)]
    pub original_price: Option<Option<Price>>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub in_stock: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub brand: Option<String>,
}
