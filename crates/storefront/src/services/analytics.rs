//! Sales analytics for the admin dashboard.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use nextshop_core::{CurrencyCode, Price, ProductId};

use crate::catalog::Catalog;
use crate::models::Order;

/// How many products the best-seller list shows.
const TOP_PRODUCTS: usize = 5;

/// How many orders the recent-orders table shows.
const RECENT_ORDERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: ProductId,
    pub name: String,
    pub units: u32,
    pub revenue: Decimal,
}

/// Store-wide sales figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub total_sales: Price,
    pub total_orders: usize,
    /// Every catalog category plus any only seen in past orders, by revenue.
    pub sales_by_category: Vec<CategorySales>,
    /// Best sellers by units sold.
    pub top_products: Vec<ProductSales>,
    /// Newest orders first.
    pub recent_orders: Vec<Order>,
}

impl SalesAnalytics {
    /// Aggregate `orders` against the current catalog.
    ///
    /// Line items are read from the order snapshots, so products since
    /// removed from the catalog still count.
    #[must_use]
    pub fn compute(orders: &[Order], catalog: &Catalog) -> Self {
        let total_sales = Price::new(
            orders.iter().map(|o| o.total.amount).sum(),
            CurrencyCode::USD,
        );

        let mut categories: Vec<CategorySales> = catalog
            .categories()
            .into_iter()
            .skip(1)
            .map(|category| CategorySales {
                category,
                revenue: Decimal::ZERO,
            })
            .collect();
        let mut products: HashMap<ProductId, ProductSales> = HashMap::new();

        for entry in orders.iter().flat_map(|o| &o.items) {
            let revenue = entry.line_total().amount;

            match categories
                .iter_mut()
                .find(|c| c.category == entry.product.category)
            {
                Some(sales) => sales.revenue += revenue,
                None => categories.push(CategorySales {
                    category: entry.product.category.clone(),
                    revenue,
                }),
            }

            let sales = products
                .entry(entry.product.id)
                .or_insert_with(|| ProductSales {
                    product_id: entry.product.id,
                    name: entry.product.name.clone(),
                    units: 0,
                    revenue: Decimal::ZERO,
                });
            sales.units += entry.quantity;
            sales.revenue += revenue;
        }

        // Stable sort keeps catalog order among equal revenues
        categories.sort_by(|a, b| b.revenue.cmp(&a.revenue));

        let mut top_products: Vec<ProductSales> = products.into_values().collect();
        top_products.sort_by(|a, b| {
            b.units
                .cmp(&a.units)
                .then_with(|| b.revenue.cmp(&a.revenue))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        top_products.truncate(TOP_PRODUCTS);

        let mut recent_orders = orders.to_vec();
        recent_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_orders.truncate(RECENT_ORDERS);

        Self {
            total_sales,
            total_orders: orders.len(),
            sales_by_category: categories,
            top_products,
            recent_orders,
        }
    }
}
