//! Authentication error types.

use thiserror::Error;

use super::store::SessionStoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] nextshop_core::EmailError),

    /// Password field left blank.
    #[error("Password is required")]
    MissingPassword,

    /// Name field left blank on registration.
    #[error("Name is required")]
    MissingName,

    /// Registration password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Wrong second-factor code. The pending sign-in is kept.
    #[error("Invalid 2FA code")]
    InvalidSecondFactor,

    /// A second-factor code was submitted with no sign-in waiting for one.
    #[error("no sign-in is awaiting a second factor")]
    NoPendingSecondFactor,

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// Reading or writing the session record failed.
    #[error("session store error: {0}")]
    Store(#[from] SessionStoreError),
}

impl AuthError {
    /// Whether the error is a form validation or rejection the user can fix.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
