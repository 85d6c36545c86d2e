//! Demo order placement.

use clap::Args;
use rust_decimal::Decimal;
use secrecy::SecretString;

use nextshop_core::ProductId;
use nextshop_storefront::Storefront;
use nextshop_storefront::models::{Address, CharityDonation, Country, PaymentDetails};
use nextshop_storefront::services::checkout::CheckoutRequest;

use super::CliError;

#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Product to buy as `ID` or `ID:QUANTITY` (repeatable)
    #[arg(short, long = "item", required = true, value_parser = parse_item)]
    items: Vec<(ProductId, u32)>,

    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    #[arg(long)]
    zip: String,

    /// US, CA or UK
    #[arg(long, default_value = "US")]
    country: Country,

    #[arg(long)]
    cardholder: String,

    #[arg(long)]
    card_number: String,

    /// MM/YY
    #[arg(long)]
    expiry: String,

    #[arg(long)]
    cvv: String,

    /// Skip the carbon offset surcharge
    #[arg(long)]
    no_carbon_offset: bool,

    /// Donation in dollars: 0, 2, 5 or 10
    #[arg(long, default_value_t = Decimal::new(5, 0))]
    donation: Decimal,
}

/// Parse `ID` or `ID:QUANTITY`.
fn parse_item(input: &str) -> Result<(ProductId, u32), String> {
    let (id, quantity) = match input.split_once(':') {
        Some((id, quantity)) => (id, quantity),
        None => (input, "1"),
    };
    let id = id
        .parse::<ProductId>()
        .map_err(|e| format!("invalid product id {id:?}: {e}"))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity {quantity:?}: {e}"))?;
    if quantity == 0 {
        return Err("quantity must be at least 1".to_string());
    }
    Ok((id, quantity))
}

/// Fill the cart and check out as the signed-in user.
pub async fn place(shop: &mut Storefront, args: OrderArgs) -> Result<(), CliError> {
    let donation = CharityDonation::from_amount(args.donation).ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "donation must be 0, 2, 5 or 10, got {}",
            args.donation
        ))
    })?;

    for (id, quantity) in &args.items {
        shop.add_to_cart(*id, *quantity)?;
    }

    let request = CheckoutRequest::new(
        Address {
            street: args.street,
            city: args.city,
            state: args.state,
            zip_code: args.zip,
            country: args.country,
        },
        PaymentDetails {
            cardholder_name: args.cardholder,
            card_number: SecretString::from(args.card_number),
            expiry_date: args.expiry,
            cvv: SecretString::from(args.cvv),
        },
    )
    .with_carbon_offset(!args.no_carbon_offset)
    .with_donation(donation);

    let quote = shop.quote(&request);
    tracing::info!("Subtotal:      {}", quote.subtotal);
    tracing::info!("Carbon offset: ${:.2}", quote.carbon_offset);
    tracing::info!("Donation:      ${:.2}", quote.donation);
    tracing::info!("Total:         {}", quote.total);

    let order = shop.place_order(request).await?;
    tracing::info!(
        "Order #{} placed: {} items, {} charged to {}",
        order.id,
        order.item_count(),
        order.total,
        order.payment_method
    );
    if let Some(tracking) = &order.tracking_number {
        tracing::info!("Tracking number: {tracking}");
    }
    Ok(())
}
