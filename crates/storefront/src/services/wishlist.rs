//! Wishlist set.

use nextshop_core::ProductId;

use crate::models::Product;

/// Saved products, unique by id, in the order they were saved.
#[derive(Debug, Clone, Default)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.contains(product.id) {
            self.remove(product.id);
            false
        } else {
            self.items.push(product.clone());
            true
        }
    }

    /// Save a product. Already-saved products are left in place.
    pub fn add(&mut self, product: &Product) {
        if !self.contains(product.id) {
            self.items.push(product.clone());
        }
    }

    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|p| p.id != id);
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    #[test]
    fn test_toggle_twice_restores() {
        let products = seed::products();
        let mut wishlist = Wishlist::new();
        wishlist.add(&products[1]);

        assert!(wishlist.toggle(&products[0]));
        assert!(wishlist.contains(products[0].id));
        assert!(!wishlist.toggle(&products[0]));

        let ids: Vec<_> = wishlist.items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![products[1].id]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let products = seed::products();
        let mut wishlist = Wishlist::new();
        wishlist.add(&products[4]);
        wishlist.add(&products[4]);
        assert_eq!(wishlist.len(), 1);
        wishlist.remove(products[4].id);
        assert!(wishlist.is_empty());
    }
}
