//! Unified error handling with Sentry integration.
//!
//! Service errors fold into [`AppError`]. Validation and rejection errors are
//! shown to the shopper as-is; anything internal is captured to Sentry and
//! replaced with a generic message.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::models::User;
use crate::services::assistant::ChatError;
use crate::services::auth::{AuthError, SessionStoreError};
use crate::services::checkout::CheckoutError;

/// Message shown for failures the shopper cannot act on.
pub const GENERIC_MESSAGE: &str = "An error occurred. Please try again.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog edit failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session record could not be read or written.
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),

    /// Order placement failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Assistant rejected the message.
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The signed-in user lacks the admin role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error comes from our side rather than the shopper's input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::SessionStore(_) | Self::Config(_) | Self::Internal(_) => true,
            Self::Auth(err) => !err.is_user_facing(),
            Self::Catalog(_) | Self::Checkout(_) | Self::Chat(_) | Self::Forbidden(_) => false,
        }
    }

    /// Text to show the shopper.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_internal() {
            return GENERIC_MESSAGE.to_string();
        }
        match self {
            Self::Catalog(err) => err.to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Chat(err) => err.to_string(),
            Self::Forbidden(_) => "You do not have permission to do that.".to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Capture internal errors to Sentry and log them.
    ///
    /// Returns the user-facing message so callers can report and display in
    /// one step.
    pub fn report(&self) -> String {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
        self.user_message()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user: &User) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.id.to_string()),
            email: Some(user.email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Forbidden("admin only".to_string());
        assert_eq!(err.to_string(), "Forbidden: admin only");

        let err = AppError::from(AuthError::PasswordMismatch);
        assert_eq!(err.to_string(), "Auth error: Passwords do not match");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AppError::from(AuthError::PasswordMismatch).user_message(),
            "Passwords do not match"
        );
        assert_eq!(
            AppError::from(AuthError::InvalidSecondFactor).user_message(),
            "Invalid 2FA code"
        );
        assert_eq!(
            AppError::from(CheckoutError::EmptyCart).user_message(),
            "Your cart is empty"
        );
    }

    #[test]
    fn test_internal_errors_are_hidden() {
        let io = std::io::Error::other("disk on fire");
        let err = AppError::from(AuthError::Store(SessionStoreError::Io(io)));
        assert!(err.is_internal());
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
        assert_eq!(err.report(), GENERIC_MESSAGE);

        let err = AppError::Internal("secret detail".to_string());
        assert!(!err.user_message().contains("secret"));
    }
}
