//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `NEXTSHOP_SESSION_PATH` - Session record file (default: .nextshop/session.json)
//! - `NEXTSHOP_ADMIN_EMAIL` - Address that signs in as the store admin (default: admin@nextshop.com)
//! - `NEXTSHOP_TWO_FACTOR_CODE` - Second-factor code for the admin (default: 123456)
//! - `NEXTSHOP_AUTH_DELAY_MS` - Simulated sign-in latency (default: 1000)
//! - `NEXTSHOP_ORDER_DELAY_MS` - Simulated order processing latency (default: 2000)
//! - `NEXTSHOP_TYPING_DELAY_MS` - Assistant typing delay, `min-max` or a single value (default: 1000-2000)
//! - `NEXTSHOP_CARBON_OFFSET` - Carbon offset surcharge in dollars (default: 2.50)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use nextshop_core::Email;

const DEFAULT_SESSION_PATH: &str = ".nextshop/session.json";
const DEFAULT_ADMIN_EMAIL: &str = "admin@nextshop.com";
const DEFAULT_TWO_FACTOR_CODE: &str = "123456";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
///
/// Implements `Debug` manually to redact the second-factor code.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Where the session record is stored
    pub session_path: PathBuf,
    /// Signing in with this address yields the admin account
    pub admin_email: String,
    /// Code the admin must enter after signing in
    pub two_factor_code: SecretString,
    /// Simulated latency for login and registration
    pub auth_delay: Duration,
    /// Simulated latency for order placement
    pub order_delay: Duration,
    /// Range the assistant's typing delay is drawn from
    pub typing_delay: DelayRange,
    /// Carbon offset surcharge added at checkout when opted in
    pub carbon_offset: Decimal,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("session_path", &self.session_path)
            .field("admin_email", &self.admin_email)
            .field("two_factor_code", &"[REDACTED]")
            .field("auth_delay", &self.auth_delay)
            .field("order_delay", &self.order_delay)
            .field("typing_delay", &self.typing_delay)
            .field("carbon_offset", &self.carbon_offset)
            .field("sentry", &self.sentry)
            .finish()
    }
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
}

/// Inclusive range of delays; a random value within it is used each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    #[must_use]
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// A range that always yields `delay`.
    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self::new(delay, delay)
    }

    /// Draw a delay from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    /// Parse `"1000-2000"` or `"1500"` (milliseconds).
    fn parse_millis(value: &str) -> Result<Self, String> {
        let (min, max) = value.split_once('-').unwrap_or((value, value));
        let min = parse_millis(min)?;
        let max = parse_millis(max)?;
        if min > max {
            return Err(format!("minimum {min:?} exceeds maximum {max:?}"));
        }
        Ok(Self::new(min, max))
    }
}

impl Default for StorefrontConfig {
    /// The documented defaults, ignoring the environment.
    fn default() -> Self {
        Self {
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            two_factor_code: SecretString::from(DEFAULT_TWO_FACTOR_CODE),
            auth_delay: Duration::from_millis(1000),
            order_delay: Duration::from_millis(2000),
            typing_delay: DelayRange::new(Duration::from_millis(1000), Duration::from_millis(2000)),
            carbon_offset: Decimal::new(250, 2),
            sentry: SentryConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let defaults = Self::default();

        let session_path = env
            .get_optional("NEXTSHOP_SESSION_PATH")
            .map_or(defaults.session_path, PathBuf::from);

        let admin_email = match env.get_optional("NEXTSHOP_ADMIN_EMAIL") {
            Some(value) => Email::parse(&value)
                .map_err(|e| invalid("NEXTSHOP_ADMIN_EMAIL", e))?
                .as_str()
                .to_string(),
            None => defaults.admin_email,
        };

        let two_factor_code = env
            .get_optional("NEXTSHOP_TWO_FACTOR_CODE")
            .map_or(defaults.two_factor_code, |code| {
                SecretString::from(code.trim().to_string())
            });

        let auth_delay = env
            .parse_with("NEXTSHOP_AUTH_DELAY_MS", parse_millis)?
            .unwrap_or(defaults.auth_delay);
        let order_delay = env
            .parse_with("NEXTSHOP_ORDER_DELAY_MS", parse_millis)?
            .unwrap_or(defaults.order_delay);
        let typing_delay = env
            .parse_with("NEXTSHOP_TYPING_DELAY_MS", DelayRange::parse_millis)?
            .unwrap_or(defaults.typing_delay);

        let carbon_offset = env
            .parse_with("NEXTSHOP_CARBON_OFFSET", parse_amount)?
            .unwrap_or(defaults.carbon_offset);

        let sentry = SentryConfig {
            dsn: env.get_optional("SENTRY_DSN"),
            environment: env.get_optional("SENTRY_ENVIRONMENT"),
        };

        Ok(Self {
            session_path,
            admin_email,
            two_factor_code,
            auth_delay,
            order_delay,
            typing_delay,
            carbon_offset,
            sentry,
        })
    }

    /// The same configuration with every simulated delay removed.
    #[must_use]
    pub fn without_delays(self) -> Self {
        Self {
            auth_delay: Duration::ZERO,
            order_delay: Duration::ZERO,
            typing_delay: DelayRange::fixed(Duration::ZERO),
            ..self
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating blank values as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a variable if it is set.
    fn parse_with<T>(
        &self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<Option<T>, ConfigError> {
        self.get_optional(key)
            .map(|value| parse(&value).map_err(|e| invalid(key, e)))
            .transpose()
    }
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

fn parse_amount(value: &str) -> Result<Decimal, String> {
    let amount = value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("{value:?} is not an amount: {e}"))?;
    if amount.is_sign_negative() {
        return Err("must not be negative".to_string());
    }
    Ok(amount)
}

fn parse_millis(value: &str) -> Result<Duration, String> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| format!("{value:?} is not a whole number of milliseconds: {e}"))
}
