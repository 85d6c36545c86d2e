//! Catalog search and filter behavior over the sample catalog.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use nextshop_integration_tests::storefront;
use nextshop_storefront::{PriceRange, Selector};

fn names(shop: &nextshop_storefront::Storefront) -> Vec<String> {
    shop.visible_products()
        .iter()
        .map(|p| p.name.clone())
        .collect()
}

#[test]
fn test_open_criteria_return_everything_in_order() {
    let shop = storefront();
    let ids: Vec<u64> = shop
        .visible_products()
        .iter()
        .map(|p| p.id.as_u64())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_search_is_case_insensitive() {
    let mut shop = storefront();
    shop.set_search("HeadPhone");
    assert_eq!(names(&shop), vec!["Premium Wireless Headphones"]);
}

#[test]
fn test_search_matches_tags() {
    let mut shop = storefront();
    shop.set_search("single-origin");
    assert_eq!(names(&shop), vec!["Artisan Coffee Beans"]);
}

#[test]
fn test_price_range_is_inclusive() {
    let mut shop = storefront();
    let criteria = shop
        .criteria()
        .clone()
        .with_price_range(PriceRange::new(Decimal::new(100, 0), Decimal::new(300, 0)));
    shop.set_criteria(criteria);

    let visible = names(&shop);
    assert!(visible.contains(&"Smart Fitness Watch".to_string()));
    assert!(visible.contains(&"Premium Wireless Headphones".to_string()));
    assert!(!visible.contains(&"Professional Camera Lens".to_string()));
    assert!(!visible.contains(&"Organic Green Tea Set".to_string()));
}

#[test]
fn test_in_stock_only_hides_the_lens() {
    let mut shop = storefront();
    let criteria = shop.criteria().clone().with_in_stock_only(true);
    shop.set_criteria(criteria);

    let visible = names(&shop);
    assert_eq!(visible.len(), 5);
    assert!(!visible.contains(&"Professional Camera Lens".to_string()));
}

#[test]
fn test_combined_filters() {
    let mut shop = storefront();
    let criteria = shop
        .criteria()
        .clone()
        .with_category(Selector::from_label("Electronics"))
        .with_brand(Selector::from_label("All"))
        .with_min_rating(Decimal::new(47, 1));
    shop.set_criteria(criteria);
    assert_eq!(
        names(&shop),
        vec!["Premium Wireless Headphones", "Professional Camera Lens"]
    );

    shop.set_search("lens");
    assert_eq!(names(&shop), vec!["Professional Camera Lens"]);
}

#[test]
fn test_inverted_range_matches_nothing() {
    let mut shop = storefront();
    let criteria = shop
        .criteria()
        .clone()
        .with_price_range(PriceRange::new(Decimal::new(500, 0), Decimal::new(50, 0)));
    shop.set_criteria(criteria);
    assert!(shop.visible_products().is_empty());

    shop.reset_filters();
    assert_eq!(shop.visible_products().len(), 6);
}

#[test]
fn test_menus_come_from_the_catalog() {
    let shop = storefront();
    assert_eq!(
        shop.catalog().categories(),
        vec!["All", "Electronics", "Fashion", "Food & Beverage"]
    );
    assert_eq!(shop.catalog().featured().len(), 4);
}
