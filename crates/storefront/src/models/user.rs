//! User domain types.
//!
//! The storefront has no user database: a [`User`] is fabricated by the mock
//! session manager and persisted only as the client-local session record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use nextshop_core::{Email, UserId, UserRole};

/// The signed-in shopper (or store admin).
///
/// Serialized as the session record: `{ id, name, email, role, createdAt, ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub two_factor_enabled: bool,
    /// Carbon offset total stored on the profile record. Starts at zero and
    /// is not touched by checkout; account totals are derived from orders.
    #[serde(default)]
    pub carbon_offset: Decimal,
}

impl User {
    /// Whether the user may administer the catalog.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_privileged()
    }

    /// First letter of the name, for avatar placeholders.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Profile edits from the account page. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub avatar: Option<String>,
}
