//! Order history and per-customer account summary.

use rust_decimal::Decimal;
use serde::Serialize;

use nextshop_core::{CurrencyCode, OrderId, Price, UserId};

use crate::models::{Order, User};

/// Orders placed during this session, oldest first.
#[derive(Debug, Clone, Default)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placed order.
    pub fn record(&mut self, order: Order) {
        self.orders.push(order);
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Orders placed by `user_id`, newest first.
    #[must_use]
    pub fn for_user(&self, user_id: UserId) -> Vec<&Order> {
        self.orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Order id derived from a millisecond timestamp, bumped past the last
    /// recorded id so two orders in the same millisecond stay distinct.
    #[must_use]
    pub fn next_id(&self, timestamp_millis: i64) -> OrderId {
        let candidate = u64::try_from(timestamp_millis).unwrap_or_default();
        let last = self.orders.iter().map(|o| o.id.as_u64()).max().unwrap_or(0);
        OrderId::new(candidate.max(last + 1))
    }
}

/// Lifetime totals shown on the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub order_count: usize,
    pub total_spent: Price,
    pub carbon_offset: Decimal,
    pub charity_donated: Decimal,
}

impl AccountSummary {
    /// Totals over `user`'s orders only.
    #[must_use]
    pub fn for_user(history: &OrderHistory, user: &User) -> Self {
        let orders = history.for_user(user.id);
        Self {
            order_count: orders.len(),
            total_spent: orders.iter().map(|o| o.total).sum(),
            carbon_offset: orders.iter().map(|o| o.carbon_offset).sum(),
            charity_donated: orders.iter().map(|o| o.charity_donation).sum(),
        }
    }

    /// Summary for a user with no orders.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            order_count: 0,
            total_spent: Price::zero(CurrencyCode::USD),
            carbon_offset: Decimal::ZERO,
            charity_donated: Decimal::ZERO,
        }
    }
}
