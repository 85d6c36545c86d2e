//! Sample catalog shipped with the demo storefront.

use rust_decimal::Decimal;

use nextshop_core::{Price, ProductId};

use crate::models::Product;

const PEXELS: &str = "https://images.pexels.com/photos";
const IMAGE_PARAMS: &str = "auto=compress&cs=tinysrgb&w=800";

fn pexels(photo: u32) -> String {
    format!("{PEXELS}/{photo}/pexels-photo-{photo}.jpeg?{IMAGE_PARAMS}")
}

fn dollars(whole: i64) -> Price {
    Price::usd(Decimal::new(whole, 0))
}

/// Rating with one decimal place, e.g. `stars(48)` is 4.8.
fn stars(tenths: i64) -> Decimal {
    Decimal::new(tenths, 1)
}

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| (*t).to_string()).collect()
}

/// The six sample products, in display order.
#[must_use]
pub fn products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            name: "Premium Wireless Headphones".to_string(),
            price: dollars(299),
            original_price: Some(dollars(399)),
            image: pexels(3_945_667),
            images: vec![pexels(3_945_667), pexels(205_926)],
            category: "Electronics".to_string(),
            description: "High-quality wireless headphones with noise cancellation and premium sound quality.".to_string(),
            rating: stars(48),
            reviews: 127,
            in_stock: true,
            tags: tags(&["wireless", "premium", "noise-cancelling"]),
            brand: "AudioTech".to_string(),
            created_at: None,
            updated_at: None,
        },
        Product {
            id: ProductId::new(2),
            name: "Smart Fitness Watch".to_string(),
            price: dollars(249),
            original_price: None,
            image: pexels(437_037),
            images: vec![pexels(437_037)],
            category: "Electronics".to_string(),
            description: "Advanced fitness tracking with heart rate monitoring and GPS.".to_string(),
            rating: stars(46),
            reviews: 89,
            in_stock: true,
            tags: tags(&["fitness", "smart", "GPS"]),
            brand: "FitTech".to_string(),
            created_at: None,
            updated_at: None,
        },
        Product {
            id: ProductId::new(3),
            name: "Minimalist Backpack".to_string(),
            price: dollars(89),
            original_price: Some(dollars(120)),
            image: pexels(2_905_238),
            images: vec![pexels(2_905_238)],
            category: "Fashion".to_string(),
            description: "Sleek, minimalist design perfect for daily commuting and travel.".to_string(),
            rating: stars(47),
            reviews: 203,
            in_stock: true,
            tags: tags(&["minimalist", "travel", "daily"]),
            brand: "UrbanCarry".to_string(),
            created_at: None,
            updated_at: None,
        },
        Product {
            id: ProductId::new(4),
            name: "Organic Green Tea Set".to_string(),
            price: dollars(45),
            original_price: None,
            image: pexels(1_638_280),
            images: vec![pexels(1_638_280)],
            category: "Food & Beverage".to_string(),
            description: "Premium organic green tea collection with traditional brewing accessories.".to_string(),
            rating: stars(49),
            reviews: 156,
            in_stock: true,
            tags: tags(&["organic", "tea", "premium"]),
            brand: "ZenLeaf".to_string(),
            created_at: None,
            updated_at: None,
        },
        Product {
            id: ProductId::new(5),
            name: "Professional Camera Lens".to_string(),
            price: dollars(899),
            original_price: None,
            image: pexels(90_946),
            images: vec![pexels(90_946)],
            category: "Electronics".to_string(),
            description: "Professional-grade camera lens for stunning photography.".to_string(),
            rating: stars(49),
            reviews: 67,
            in_stock: false,
            tags: tags(&["professional", "photography", "lens"]),
            brand: "LensCraft".to_string(),
            created_at: None,
            updated_at: None,
        },
        Product {
            id: ProductId::new(6),
            name: "Artisan Coffee Beans".to_string(),
            price: dollars(24),
            original_price: None,
            image: pexels(894_695),
            images: vec![pexels(894_695)],
            category: "Food & Beverage".to_string(),
            description: "Single-origin artisan coffee beans, expertly roasted for rich flavor.".to_string(),
            rating: stars(45),
            reviews: 234,
            in_stock: true,
            tags: tags(&["artisan", "coffee", "single-origin"]),
            brand: "RoastMaster".to_string(),
            created_at: None,
            updated_at: None,
        },
    ]
}
