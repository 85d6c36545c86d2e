//! Catalog filtering.
//!
//! [`filter_products`] is the single evaluator behind the product grid: a
//! stable filter (never a sort) combining free-text search with the sidebar
//! criteria. Every predicate must hold for a product to be kept.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;

/// Label used for the "no restriction" option in category and brand menus.
pub const ALL: &str = "All";

/// A category or brand selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Matches every value.
    #[default]
    All,
    /// Matches one exact value.
    Only(String),
}

impl Selector {
    /// Build from a menu label, treating [`ALL`] as the wildcard.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    /// Whether `value` is selected.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == value,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => f.write_str(value),
        }
    }
}

/// Inclusive price bounds.
///
/// An inverted range (`low > high`) is kept as given and simply matches
/// nothing; [`PriceRange::is_inverted`] lets callers flag it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: Decimal,
    pub high: Decimal,
}

impl PriceRange {
    /// Create a range from its bounds.
    #[must_use]
    pub const fn new(low: Decimal, high: Decimal) -> Self {
        Self { low, high }
    }

    /// Whether `amount` lies within both bounds.
    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.low && amount <= self.high
    }

    /// Whether the bounds are reversed.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.low > self.high
    }
}

impl Default for PriceRange {
    /// The slider's initial position, $0 to $1000.
    fn default() -> Self {
        Self::new(Decimal::ZERO, Decimal::ONE_THOUSAND)
    }
}

/// The sidebar filter state.
///
/// Always replaced as a whole; the `with_*` methods return a new complete
/// value rather than patching fields in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub category: Selector,
    pub brand: Selector,
    pub price_range: PriceRange,
    /// Minimum average rating, 0 disables the check.
    pub min_rating: Decimal,
    pub in_stock_only: bool,
}

impl FilterCriteria {
    /// Criteria that keep every product priced up to `max_price`.
    #[must_use]
    pub fn open(max_price: Decimal) -> Self {
        Self {
            price_range: PriceRange::new(Decimal::ZERO, max_price),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_category(self, category: Selector) -> Self {
        Self { category, ..self }
    }

    #[must_use]
    pub fn with_brand(self, brand: Selector) -> Self {
        Self { brand, ..self }
    }

    #[must_use]
    pub fn with_price_range(self, price_range: PriceRange) -> Self {
        Self {
            price_range,
            ..self
        }
    }

    #[must_use]
    pub fn with_min_rating(self, min_rating: Decimal) -> Self {
        Self { min_rating, ..self }
    }

    #[must_use]
    pub fn with_in_stock_only(self, in_stock_only: bool) -> Self {
        Self {
            in_stock_only,
            ..self
        }
    }

    /// Whether a product passes every non-text predicate.
    #[must_use]
    pub fn accepts(&self, product: &Product) -> bool {
        self.category.matches(&product.category)
            && self.brand.matches(&product.brand)
            && self.price_range.contains(product.price.amount)
            && product.rating >= self.min_rating
            && (!self.in_stock_only || product.in_stock)
    }
}

/// Case-insensitive substring match on name, description, or any tag.
///
/// `needle` must already be lower-cased. An empty needle matches everything.
#[must_use]
pub fn matches_search(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Products matching `search` and `criteria`, in their original order.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    search: &str,
    criteria: &FilterCriteria,
) -> Vec<&'a Product> {
    matching_positions(products, search, criteria)
        .into_iter()
        .filter_map(|i| products.get(i))
        .collect()
}

/// Indices into `products` of the entries [`filter_products`] keeps, ascending.
#[must_use]
pub fn matching_positions(
    products: &[Product],
    search: &str,
    criteria: &FilterCriteria,
) -> Vec<usize> {
    let needle = search.to_lowercase();
    if criteria.price_range.is_inverted() {
        tracing::debug!(
            low = %criteria.price_range.low,
            high = %criteria.price_range.high,
            "Inverted price range, no product can match"
        );
    }

    products
        .iter()
        .enumerate()
        .filter(|(_, product)| matches_search(product, &needle) && criteria.accepts(product))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    fn dollars(whole: i64) -> Decimal {
        Decimal::new(whole, 0)
    }

    #[test]
    fn test_open_criteria_keep_everything_in_order() {
        let products = seed::products();
        let criteria = FilterCriteria::open(dollars(899));
        let result = filter_products(&products, "", &criteria);
        let expected: Vec<&Product> = products.iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_default_slider_excludes_nothing_under_1000() {
        let products = seed::products();
        let result = filter_products(&products, "", &FilterCriteria::default());
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let products = seed::products();
        let result = filter_products(&products, "HeadPhone", &FilterCriteria::default());
        assert_eq!(names(&result), vec!["Premium Wireless Headphones"]);
    }

    #[test]
    fn test_search_matches_description_and_tags() {
        let products = seed::products();
        let by_description = filter_products(&products, "heart rate", &FilterCriteria::default());
        assert_eq!(names(&by_description), vec!["Smart Fitness Watch"]);

        let by_tag = filter_products(&products, "single-origin", &FilterCriteria::default());
        assert_eq!(names(&by_tag), vec!["Artisan Coffee Beans"]);

        let premium = filter_products(&products, "premium", &FilterCriteria::default());
        assert_eq!(
            names(&premium),
            vec!["Premium Wireless Headphones", "Organic Green Tea Set"]
        );
    }

    #[test]
    fn test_category_and_brand_selectors() {
        let products = seed::products();
        let electronics = FilterCriteria::default()
            .with_category(Selector::from_label("Electronics"));
        assert_eq!(filter_products(&products, "", &electronics).len(), 3);

        let fit_tech = electronics.with_brand(Selector::Only("FitTech".to_string()));
        assert_eq!(
            names(&filter_products(&products, "", &fit_tech)),
            vec!["Smart Fitness Watch"]
        );

        let wrong_case = FilterCriteria::default().with_category(Selector::from_label("fashion"));
        assert!(filter_products(&products, "", &wrong_case).is_empty());
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let products = seed::products();
        let criteria = FilterCriteria::default()
            .with_price_range(PriceRange::new(dollars(100), dollars(300)));
        let result = names(&filter_products(&products, "", &criteria));
        assert_eq!(
            result,
            vec!["Premium Wireless Headphones", "Smart Fitness Watch"]
        );

        let exact = FilterCriteria::default()
            .with_price_range(PriceRange::new(dollars(249), dollars(249)));
        assert_eq!(
            names(&filter_products(&products, "", &exact)),
            vec!["Smart Fitness Watch"]
        );
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let products = seed::products();
        let range = PriceRange::new(dollars(300), dollars(100));
        assert!(range.is_inverted());
        let criteria = FilterCriteria::default().with_price_range(range);
        assert!(filter_products(&products, "", &criteria).is_empty());
    }

    #[test]
    fn test_matching_positions_are_catalog_indices() {
        let products = seed::products();
        let criteria = FilterCriteria::default().with_category(Selector::from_label("Food & Beverage"));
        assert_eq!(matching_positions(&products, "", &criteria), vec![3, 5]);

        let inverted = criteria.with_price_range(PriceRange::new(dollars(50), dollars(10)));
        assert!(matching_positions(&products, "", &inverted).is_empty());
    }

    #[test]
    fn test_min_rating() {
        let products = seed::products();
        let criteria = FilterCriteria::default().with_min_rating(Decimal::new(49, 1));
        assert_eq!(
            names(&filter_products(&products, "", &criteria)),
            vec!["Organic Green Tea Set", "Professional Camera Lens"]
        );
    }

    #[test]
    fn test_in_stock_only_drops_the_lens() {
        let products = seed::products();
        let criteria = FilterCriteria::default().with_in_stock_only(true);
        let result = names(&filter_products(&products, "", &criteria));
        assert_eq!(result.len(), 5);
        assert!(!result.contains(&"Professional Camera Lens".to_string()));
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let products = seed::products();
        let criteria = FilterCriteria::default()
            .with_category(Selector::from_label("Electronics"))
            .with_in_stock_only(true)
            .with_price_range(PriceRange::new(dollars(250), dollars(1000)));
        assert_eq!(
            names(&filter_products(&products, "wireless", &criteria)),
            vec!["Premium Wireless Headphones"]
        );
        assert!(filter_products(&products, "lens", &criteria).is_empty());
    }

    #[test]
    fn test_selector_labels() {
        assert_eq!(Selector::from_label("All"), Selector::All);
        assert_eq!(Selector::All.to_string(), "All");
        assert_eq!(Selector::from_label("ZenLeaf").to_string(), "ZenLeaf");
    }
}
