//! Mock session manager.
//!
//! Sign-in accepts any password and fabricates a user after a simulated
//! delay. The reserved admin address must additionally pass a fixed
//! second-factor code before the session is established. The signed-in user
//! is persisted through a [`SessionStore`] so it survives restarts.

mod error;
pub mod store;

pub use error::AuthError;
pub use store::{
    FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError, SessionStoreExt,
};

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use nextshop_core::{Email, UserId, UserRole};

use crate::config::StorefrontConfig;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{ProfileUpdate, User, session_keys};

/// Id given to every user fabricated by [`SessionManager::login`].
const LOGIN_USER_ID: u64 = 1;

/// Where the session is in the sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    /// Waiting out the simulated sign-in latency.
    Authenticating,
    /// Admin credentials accepted, second-factor code outstanding.
    AwaitingSecondFactor(User),
    Authenticated(User),
}

/// Result of a successful [`SessionManager::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn(User),
    /// Call [`SessionManager::verify_second_factor`] to finish signing in.
    SecondFactorRequired,
}

/// Owns the session state and its persisted record.
pub struct SessionManager {
    state: SessionState,
    store: Box<dyn SessionStore>,
    admin_email: String,
    two_factor_code: SecretString,
    auth_delay: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state)
            .field("admin_email", &self.admin_email)
            .field("two_factor_code", &"[REDACTED]")
            .field("auth_delay", &self.auth_delay)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create an anonymous session backed by `store`.
    #[must_use]
    pub fn new(config: &StorefrontConfig, store: Box<dyn SessionStore>) -> Self {
        Self {
            state: SessionState::Anonymous,
            store,
            admin_email: config.admin_email.clone(),
            two_factor_code: config.two_factor_code.clone(),
            auth_delay: config.auth_delay,
        }
    }

    /// Create a session, resuming the user recorded in `store` if any.
    ///
    /// An unreadable record is discarded and the session starts anonymous.
    #[instrument(skip_all)]
    pub fn restore(config: &StorefrontConfig, store: Box<dyn SessionStore>) -> Self {
        let mut manager = Self::new(config, store);
        match manager.store.get::<User>(session_keys::USER) {
            Ok(Some(user)) => {
                tracing::info!(user_id = %user.id, "Restored session");
                set_sentry_user(&user);
                manager.state = SessionState::Authenticated(user);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session record");
                if let Err(e) = manager.store.remove(session_keys::USER) {
                    tracing::warn!(error = %e, "Failed to discard session record");
                }
            }
        }
        manager
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The signed-in user, if the session is established.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// Whether a sign-in or registration is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Authenticating)
    }

    /// Sign in with any password.
    ///
    /// The admin address moves to [`SessionState::AwaitingSecondFactor`];
    /// everyone else is signed in immediately.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::MissingPassword` for
    /// bad input (no state change), or `AuthError::Store` if the session
    /// record cannot be written.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        self.state = SessionState::Authenticating;
        tokio::time::sleep(self.auth_delay).await;

        let is_admin = email.matches(&self.admin_email);
        let user = User {
            id: UserId::new(LOGIN_USER_ID),
            name: if is_admin { "Admin User" } else { "John Doe" }.to_string(),
            email,
            avatar: None,
            role: if is_admin {
                UserRole::Admin
            } else {
                UserRole::Customer
            },
            created_at: Utc::now(),
            two_factor_enabled: is_admin,
            carbon_offset: Decimal::ZERO,
        };

        if is_admin {
            tracing::info!("Second factor required");
            self.state = SessionState::AwaitingSecondFactor(user);
            return Ok(LoginOutcome::SecondFactorRequired);
        }

        self.establish(user.clone())?;
        Ok(LoginOutcome::SignedIn(user))
    }

    /// Create a customer account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` before any delay when the
    /// confirmation differs, `AuthError::MissingName`,
    /// `AuthError::InvalidEmail` or `AuthError::MissingPassword` for other
    /// bad input, or `AuthError::Store` if the record cannot be written.
    #[instrument(skip(self, password, confirm))]
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<User, AuthError> {
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        self.state = SessionState::Authenticating;
        tokio::time::sleep(self.auth_delay).await;

        let created_at = Utc::now();
        let user = User {
            id: UserId::new(u64::try_from(created_at.timestamp_millis()).unwrap_or_default()),
            name: name.to_string(),
            email,
            avatar: None,
            role: UserRole::Customer,
            created_at,
            two_factor_enabled: false,
            carbon_offset: Decimal::ZERO,
        };

        self.establish(user.clone())?;
        Ok(user)
    }

    /// Finish an admin sign-in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSecondFactor` for a wrong code (the pending
    /// sign-in is kept), `AuthError::NoPendingSecondFactor` when nothing is
    /// pending, or `AuthError::Store` if the record cannot be written.
    #[instrument(skip_all)]
    pub fn verify_second_factor(&mut self, code: &str) -> Result<User, AuthError> {
        let SessionState::AwaitingSecondFactor(user) = &self.state else {
            return Err(AuthError::NoPendingSecondFactor);
        };
        if code.trim() != self.two_factor_code.expose_secret() {
            tracing::warn!("Invalid second-factor code");
            return Err(AuthError::InvalidSecondFactor);
        }

        let user = user.clone();
        self.establish(user.clone())?;
        Ok(user)
    }

    /// Abandon a pending admin sign-in.
    pub fn cancel_second_factor(&mut self) {
        if matches!(self.state, SessionState::AwaitingSecondFactor(_)) {
            self.state = SessionState::Anonymous;
        }
    }

    /// Sign out and delete the stored record.
    ///
    /// The in-memory session is cleared even if the record cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the record cannot be deleted.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.state = SessionState::Anonymous;
        clear_sentry_user();
        self.store.remove(session_keys::USER)?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Apply profile edits to the signed-in user and re-persist it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without an established session,
    /// `AuthError::MissingName` for a blank name, or `AuthError::Store` if
    /// the record cannot be written.
    #[instrument(skip_all)]
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, AuthError> {
        let SessionState::Authenticated(current) = &self.state else {
            return Err(AuthError::NotSignedIn);
        };

        let mut user = current.clone();
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AuthError::MissingName);
            }
            name.clone_into(&mut user.name);
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }

        self.establish(user.clone())?;
        Ok(user)
    }

    fn establish(&mut self, user: User) -> Result<(), AuthError> {
        if let Err(e) = self.store.insert(session_keys::USER, &user) {
            self.state = SessionState::Anonymous;
            return Err(e.into());
        }
        set_sentry_user(&user);
        tracing::info!(user_id = %user.id, role = %user.role, "Session established");
        self.state = SessionState::Authenticated(user);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        let config = StorefrontConfig::default().without_delays();
        SessionManager::new(&config, Box::new(MemorySessionStore::new()))
    }

    #[tokio::test]
    async fn test_customer_login() {
        let mut session = manager();
        let outcome = session.login("shopper@example.com", "pw").await.unwrap();
        let LoginOutcome::SignedIn(user) = outcome else {
            panic!("expected immediate sign-in");
        };
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(session.user(), Some(&user));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_input_without_state_change() {
        let mut session = manager();
        assert!(matches!(
            session.login("nope", "pw").await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            session.login("a@b.com", "").await,
            Err(AuthError::MissingPassword)
        ));
        assert_eq!(session.state(), &SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_admin_requires_second_factor() {
        let mut session = manager();
        let outcome = session.login(" admin@nextshop.com ", "pw").await.unwrap();
        assert_eq!(outcome, LoginOutcome::SecondFactorRequired);
        assert!(!session.is_authenticated());

        assert!(matches!(
            session.verify_second_factor("000000"),
            Err(AuthError::InvalidSecondFactor)
        ));
        assert!(matches!(session.state(), SessionState::AwaitingSecondFactor(_)));

        let admin = session.verify_second_factor("123456").unwrap();
        assert_eq!(admin.name, "Admin User");
        assert!(admin.is_admin());
        assert!(admin.two_factor_enabled);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_admin_address_must_match_exactly() {
        let mut session = manager();
        let outcome = session.login("ADMIN@NEXTSHOP.COM", "pw").await.unwrap();
        let LoginOutcome::SignedIn(user) = outcome else {
            panic!("differently cased admin address should sign in directly");
        };
        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(user.name, "John Doe");
        assert!(!user.two_factor_enabled);
    }

    #[tokio::test]
    async fn test_cancel_second_factor() {
        let mut session = manager();
        session.login("admin@nextshop.com", "pw").await.unwrap();
        session.cancel_second_factor();
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(matches!(
            session.verify_second_factor("123456"),
            Err(AuthError::NoPendingSecondFactor)
        ));
    }

    #[tokio::test]
    async fn test_register_checks_confirmation_first() {
        let mut session = manager();
        assert!(matches!(
            session.register("", "bad", "a", "b").await,
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            session.register(" ", "jane@example.com", "a", "a").await,
            Err(AuthError::MissingName)
        ));

        let user = session
            .register("Jane", "jane@example.com", "secret", "secret")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Customer);
        assert_ne!(user.id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_registering_admin_address_yields_customer() {
        let mut session = manager();
        let user = session
            .register("Sneaky", "admin@nextshop.com", "x", "x")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Customer);
    }

    #[tokio::test]
    async fn test_logout_clears_record() {
        let config = StorefrontConfig::default().without_delays();
        let mut session = SessionManager::new(&config, Box::new(MemorySessionStore::new()));
        session.login("shopper@example.com", "pw").await.unwrap();
        assert!(session.store.get_value(session_keys::USER).unwrap().is_some());

        session.logout().unwrap();
        assert!(session.user().is_none());
        assert!(session.store.get_value(session_keys::USER).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_resumes_user() {
        let config = StorefrontConfig::default().without_delays();
        let mut store = MemorySessionStore::new();
        let mut session = SessionManager::new(&config, Box::new(store.clone()));
        let LoginOutcome::SignedIn(user) = session.login("a@b.com", "pw").await.unwrap() else {
            panic!("expected sign-in");
        };
        store.insert(session_keys::USER, &user).unwrap();

        let restored = SessionManager::restore(&config, Box::new(store));
        assert_eq!(restored.user(), Some(&user));
    }

    #[test]
    fn test_restore_discards_corrupt_record() {
        let config = StorefrontConfig::default();
        let mut store = MemorySessionStore::new();
        store
            .insert_value(session_keys::USER, serde_json::json!({ "id": "x" }))
            .unwrap();
        let restored = SessionManager::restore(&config, Box::new(store));
        assert_eq!(restored.state(), &SessionState::Anonymous);
        assert!(restored.store.get_value(session_keys::USER).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let mut session = manager();
        assert!(matches!(
            session.update_profile(ProfileUpdate::default()),
            Err(AuthError::NotSignedIn)
        ));

        session.login("a@b.com", "pw").await.unwrap();
        let user = session
            .update_profile(ProfileUpdate {
                name: Some("Jo".to_string()),
                email: Some(Email::parse("jo@b.com").unwrap()),
                avatar: None,
            })
            .unwrap();
        assert_eq!(user.name, "Jo");
        assert_eq!(user.email.as_str(), "jo@b.com");
        let stored: User = session.store.get(session_keys::USER).unwrap().unwrap();
        assert_eq!(stored, user);
    }
}
