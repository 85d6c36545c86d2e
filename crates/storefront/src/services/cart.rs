//! Cart ledger.
//!
//! Holds product snapshots with quantities. At most one entry exists per
//! product id and every entry has a quantity of at least 1.

use tracing::instrument;

use nextshop_core::{Price, ProductId};

use crate::models::{CartEntry, Product};

/// The shopper's cart plus the visibility of the cart drawer.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    entries: Vec<CartEntry>,
    open: bool,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`, merging with an existing entry.
    ///
    /// A quantity of 0 leaves the cart unchanged.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(entry) = self.entry_mut(product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            self.entries.push(CartEntry {
                product: product.clone(),
                quantity,
            });
        }
        tracing::debug!(total_items = self.total_items(), "Added to cart");
    }

    /// Set the quantity for a product. Zero or negative removes the entry.
    ///
    /// Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }
        if let Some(entry) = self.entry_mut(id) {
            entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Drop the entry for `id`, if any.
    pub fn remove(&mut self, id: ProductId) {
        self.entries.retain(|e| e.product.id != id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|e| e.product.id == id)
    }

    /// Quantity held for `id`, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.entries
            .iter()
            .find(|e| e.product.id == id)
            .map_or(0, |e| e.quantity)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Sum of unit price times quantity over all entries.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    // Drawer visibility

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub const fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub const fn open(&mut self) {
        self.open = true;
    }

    pub const fn close(&mut self) {
        self.open = false;
    }

    fn entry_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product.id == id)
    }
}
