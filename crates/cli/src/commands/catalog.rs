//! Catalog browsing and the shopping assistant.

use clap::Args;
use rust_decimal::Decimal;

use nextshop_storefront::services::assistant::ChatSession;
use nextshop_storefront::{AppError, PriceRange, Selector, Storefront};

use super::CliError;

#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Case-insensitive text matched against name, description and tags
    #[arg(short, long, default_value = "")]
    search: String,

    /// Category name, or "All"
    #[arg(long, default_value = "All")]
    category: String,

    /// Brand name, or "All"
    #[arg(long, default_value = "All")]
    brand: String,

    /// Lowest price to include
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest price to include (defaults to the most expensive product)
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Minimum average rating
    #[arg(long, default_value_t = Decimal::ZERO)]
    min_rating: Decimal,

    /// Hide out-of-stock products
    #[arg(long)]
    in_stock: bool,
}

/// List products matching the search and filters.
pub fn products(shop: &mut Storefront, args: &ProductsArgs) -> Result<(), CliError> {
    let open = shop.catalog().open_criteria();
    let range = PriceRange::new(
        args.min_price.unwrap_or(open.price_range.low),
        args.max_price.unwrap_or(open.price_range.high),
    );
    let criteria = open
        .with_category(Selector::from_label(&args.category))
        .with_brand(Selector::from_label(&args.brand))
        .with_price_range(range)
        .with_min_rating(args.min_rating)
        .with_in_stock_only(args.in_stock);

    shop.set_search(args.search.as_str());
    shop.set_criteria(criteria);

    let visible = shop.visible_products();
    tracing::info!(
        "{} of {} products",
        visible.len(),
        shop.catalog().len()
    );
    for product in visible {
        let sale = product
            .discount_percent()
            .map(|pct| format!(" (-{pct}%)"))
            .unwrap_or_default();
        let stock = if product.in_stock { "" } else { " [out of stock]" };
        tracing::info!(
            "#{:<3} {:<28} {:>10}{sale}  {} / {}  {} ({} reviews){stock}",
            product.id,
            product.name,
            product.price.to_string(),
            product.category,
            product.brand,
            product.rating,
            product.reviews,
        );
    }

    Ok(())
}

/// Send one message to the assistant and print its reply.
pub async fn chat(shop: &Storefront, message: &str) -> Result<(), CliError> {
    let mut session = ChatSession::new(shop.config());
    let reply = session
        .send(message, shop.catalog().products())
        .await
        .map_err(AppError::from)?;

    tracing::info!("{}", reply.text);
    for rec in &reply.recommendations {
        let name = shop
            .catalog()
            .get(rec.product_id)
            .map_or("(unknown product)", |p| p.name.as_str());
        tracing::info!(
            "  -> #{} {name}: {} ({:.0}% match)",
            rec.product_id,
            rec.reason,
            rec.confidence * 100.0
        );
    }
    Ok(())
}
