//! Cart line types.

use serde::{Deserialize, Serialize};

use nextshop_core::Price;

use super::Product;

/// One product in the cart with its quantity.
///
/// Quantities are always at least 1; the ledger removes entries instead of
/// keeping them at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}
