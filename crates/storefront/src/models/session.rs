//! Session storage keys.
//!
//! The session record lives in a small key/value document modelled on
//! browser local storage.

/// Session keys for authentication data.
pub mod keys {
    /// Key holding the serialized signed-in [`User`](crate::models::User).
    pub const USER: &str = "user";
}
