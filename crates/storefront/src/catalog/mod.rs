//! Product catalog store.
//!
//! The [`Catalog`] owns the product list and is the only place products are
//! created, edited or removed. Filter results are memoized with `moka`, keyed
//! on the catalog revision so that any edit makes earlier results unreachable.

pub mod filter;
pub mod seed;

use core::fmt;

use chrono::Utc;
use moka::sync::Cache;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use nextshop_core::ProductId;

use crate::models::{NewProduct, Product, ProductUpdate};

pub use filter::{FilterCriteria, PriceRange, Selector, filter_products};

/// Rating given to newly added products until real reviews exist.
const NEW_PRODUCT_RATING: Decimal = Decimal::from_parts(45, 0, 0, false, 1);

/// Number of products shown in the featured strip.
const FEATURED_COUNT: usize = 4;

/// Upper bound on memoized filter results.
const MEMO_CAPACITY: u64 = 256;

/// Errors from catalog edits.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    revision: u64,
    search: String,
    criteria: FilterCriteria,
}

/// In-memory product catalog.
pub struct Catalog {
    products: Vec<Product>,
    revision: u64,
    /// Positions into `products` for each (revision, search, criteria).
    memo: Cache<MemoKey, std::sync::Arc<Vec<usize>>>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("products", &self.products.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Catalog {
    /// Create a catalog holding `products` in the given order.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            revision: 0,
            memo: Cache::builder().max_capacity(MEMO_CAPACITY).build(),
        }
    }

    /// The sample catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed::products())
    }

    /// All products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Incremented on every edit.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Filter the catalog, reusing a memoized result when one exists for the
    /// current revision.
    #[instrument(skip(self, criteria), fields(revision = self.revision))]
    pub fn search(&self, search: &str, criteria: &FilterCriteria) -> Vec<&Product> {
        let key = MemoKey {
            revision: self.revision,
            search: search.to_string(),
            criteria: criteria.clone(),
        };

        let positions = self.memo.get_with(key, || {
            debug!("Filter memo miss");
            std::sync::Arc::new(filter::matching_positions(&self.products, search, criteria))
        });

        positions
            .iter()
            .filter_map(|&i| self.products.get(i))
            .collect()
    }

    /// Category menu entries: "All" then each distinct category, first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        menu(self.products.iter().map(|p| p.category.as_str()))
    }

    /// Brand menu entries: "All" then each distinct brand, first-seen order.
    #[must_use]
    pub fn brands(&self) -> Vec<String> {
        menu(self.products.iter().map(|p| p.brand.as_str()))
    }

    /// The first few products, shown on the landing page.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        let end = self.products.len().min(FEATURED_COUNT);
        self.products.get(..end).unwrap_or_default()
    }

    /// Highest current price, or zero for an empty catalog.
    #[must_use]
    pub fn max_price(&self) -> Decimal {
        self.products
            .iter()
            .map(|p| p.price.amount)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Criteria that match the whole catalog.
    #[must_use]
    pub fn open_criteria(&self) -> FilterCriteria {
        FilterCriteria::open(self.max_price())
    }

    /// Add a product, assigning the next id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingField`] if a required text field is blank.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub fn add(&mut self, new: NewProduct) -> Result<Product, CatalogError> {
        require("Name", &new.name)?;
        require("Brand", &new.brand)?;
        require("Category", &new.category)?;
        require("Description", &new.description)?;

        let id = self.next_id();
        let now = Utc::now();
        let images = if new.images.is_empty() {
            vec![new.image.clone()]
        } else {
            new.images
        };

        let product = Product {
            id,
            name: new.name,
            price: new.price,
            original_price: new.original_price,
            image: new.image,
            images,
            category: new.category,
            description: new.description,
            rating: NEW_PRODUCT_RATING,
            reviews: 0,
            in_stock: new.in_stock,
            tags: new.tags,
            brand: new.brand,
            created_at: Some(now),
            updated_at: Some(now),
        };

        self.products.push(product.clone());
        self.bump();
        tracing::info!(product_id = %id, "Product added");
        Ok(product)
    }

    /// Apply a partial edit to a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id and
    /// [`CatalogError::MissingField`] if an edit would blank a required field.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub fn update(&mut self, id: ProductId, update: ProductUpdate) -> Result<Product, CatalogError> {
        for (field, value) in [
            ("Name", &update.name),
            ("Brand", &update.brand),
            ("Category", &update.category),
            ("Description", &update.description),
        ] {
            if let Some(value) = value {
                require(field, value)?;
            }
        }

        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(original_price) = update.original_price {
            product.original_price = original_price;
        }
        if let Some(image) = update.image {
            product.image = image;
        }
        if let Some(images) = update.images {
            product.images = images;
        }
        if let Some(category) = update.category {
            product.category = category;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(in_stock) = update.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(tags) = update.tags {
            product.tags = tags;
        }
        if let Some(brand) = update.brand {
            product.brand = brand;
        }
        product.updated_at = Some(Utc::now());

        let updated = product.clone();
        self.bump();
        tracing::info!("Product updated");
        Ok(updated)
    }

    /// Remove a product. Carts and wishlists holding it are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove(&mut self, id: ProductId) -> Result<Product, CatalogError> {
        let position = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;
        let removed = self.products.remove(position);
        self.bump();
        tracing::info!("Product removed");
        Ok(removed)
    }

    fn next_id(&self) -> ProductId {
        let max = self.products.iter().map(|p| p.id.as_u64()).max().unwrap_or(0);
        ProductId::new(max + 1)
    }

    fn bump(&mut self) {
        self.revision += 1;
        self.memo.invalidate_all();
    }
}

fn require(field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        Err(CatalogError::MissingField(field))
    } else {
        Ok(())
    }
}

fn menu<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut entries = vec![filter::ALL.to_string()];
    for value in values {
        if !entries.iter().skip(1).any(|e| e == value) {
            entries.push(value.to_string());
        }
    }
    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nextshop_core::Price;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Price::usd(Decimal::new(1999, 2)),
            original_price: None,
            image: "https://example.com/mug.jpg".to_string(),
            images: Vec::new(),
            category: "Home".to_string(),
            description: "A sturdy mug.".to_string(),
            in_stock: true,
            tags: NewProduct::parse_tags("ceramic, kitchen"),
            brand: "Kiln".to_string(),
        }
    }

    #[test]
    fn test_menus_start_with_all() {
        let catalog = Catalog::seeded();
        assert_eq!(
            catalog.categories(),
            vec!["All", "Electronics", "Fashion", "Food & Beverage"]
        );
        assert_eq!(catalog.brands().first().map(String::as_str), Some("All"));
        assert_eq!(catalog.brands().len(), 7);
    }

    #[test]
    fn test_featured_and_max_price() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.featured().len(), 4);
        assert_eq!(catalog.max_price(), Decimal::new(899, 0));
        assert!(Catalog::default().featured().is_empty());
        assert_eq!(Catalog::default().max_price(), Decimal::ZERO);
    }

    #[test]
    fn test_open_criteria_return_everything() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.search("", &catalog.open_criteria()).len(), 6);
    }

    #[test]
    fn test_search_matches_evaluator() {
        let catalog = Catalog::seeded();
        let criteria = FilterCriteria::default().with_in_stock_only(true);
        let memoized = catalog.search("e", &criteria);
        let direct = filter_products(catalog.products(), "e", &criteria);
        assert_eq!(memoized, direct);
        // Second call is served from the memo and must agree
        assert_eq!(catalog.search("e", &criteria), direct);
    }

    #[test]
    fn test_memoized_search_agrees_on_every_predicate() {
        let catalog = Catalog::seeded();
        let open = catalog.open_criteria();
        let cases = [
            ("headphone", open.clone()),
            ("TEA", open.clone()),
            ("", open.clone().with_brand(Selector::from_label("LensCraft"))),
            ("", open.clone().with_min_rating(Decimal::new(47, 1))),
            (
                "",
                open.clone()
                    .with_price_range(PriceRange::new(Decimal::new(300, 0), Decimal::new(100, 0))),
            ),
        ];
        for (search, criteria) in &cases {
            assert_eq!(
                catalog.search(search, criteria),
                filter_products(catalog.products(), search, criteria),
                "search {search:?} with {criteria:?}"
            );
        }
    }

    #[test]
    fn test_add_assigns_next_id_and_defaults() {
        let mut catalog = Catalog::seeded();
        let product = catalog.add(new_product("Stoneware Mug")).unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.rating, Decimal::new(45, 1));
        assert_eq!(product.reviews, 0);
        assert_eq!(product.images, vec![product.image.clone()]);
        assert!(product.created_at.is_some());
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_add_requires_text_fields() {
        let mut catalog = Catalog::seeded();
        let mut blank = new_product("  ");
        assert_eq!(catalog.add(blank.clone()), Err(CatalogError::MissingField("Name")));
        blank.name = "Mug".to_string();
        blank.brand = String::new();
        assert_eq!(catalog.add(blank), Err(CatalogError::MissingField("Brand")));
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.revision(), 0);
    }

    #[test]
    fn test_edit_invalidates_memo() {
        let mut catalog = Catalog::seeded();
        let criteria = FilterCriteria::default();
        assert_eq!(catalog.search("mug", &criteria).len(), 0);

        catalog.add(new_product("Stoneware Mug")).unwrap();
        assert_eq!(catalog.search("mug", &criteria).len(), 1);

        catalog.remove(ProductId::new(7)).unwrap();
        assert!(catalog.search("mug", &criteria).is_empty());
        assert_eq!(catalog.revision(), 2);
    }

    #[test]
    fn test_update_replaces_only_given_fields() {
        let mut catalog = Catalog::seeded();
        let updated = catalog
            .update(
                ProductId::new(1),
                ProductUpdate {
                    price: Some(Price::usd(Decimal::new(279, 0))),
                    original_price: Some(None),
                    in_stock: Some(false),
                    ..ProductUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price.amount, Decimal::new(279, 0));
        assert_eq!(updated.original_price, None);
        assert!(!updated.in_stock);
        assert_eq!(updated.name, "Premium Wireless Headphones");
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_update_rejects_blank_and_unknown() {
        let mut catalog = Catalog::seeded();
        let blank = ProductUpdate {
            description: Some(String::new()),
            ..ProductUpdate::default()
        };
        assert_eq!(
            catalog.update(ProductId::new(1), blank),
            Err(CatalogError::MissingField("Description"))
        );
        assert_eq!(
            catalog.update(ProductId::new(99), ProductUpdate::default()),
            Err(CatalogError::NotFound(ProductId::new(99)))
        );
    }

    #[test]
    fn test_remove_unknown() {
        let mut catalog = Catalog::seeded();
        assert_eq!(
            catalog.remove(ProductId::new(42)),
            Err(CatalogError::NotFound(ProductId::new(42)))
        );
    }
}
