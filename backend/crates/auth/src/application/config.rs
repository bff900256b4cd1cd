//! Application Configuration
//!
//! Configuration for the Auth application layer. Constructed once at
//! process start and injected where needed; there is no global config
//! state.

use chrono::Duration;
use thiserror::Error;

/// Refresh token lifetime in days, independent of the access lifetime
pub const REFRESH_TOKEN_DAYS: i64 = 30;

/// Environment variable names read by [`AuthConfig::from_env`]
const ENV_ACCESS_SECRET: &str = "ACCESS_TOKEN_SECRET";
const ENV_REFRESH_SECRET: &str = "REFRESH_TOKEN_SECRET";
const ENV_ACCESS_HOURS: &str = "ACCESS_TOKEN_HOURS";

/// Default access token lifetime when `ACCESS_TOKEN_HOURS` is unset
const DEFAULT_ACCESS_HOURS: u64 = 24;

/// Configuration errors are startup-fatal; the service must not come
/// up with a broken token configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required secret is missing or empty
    #[error("{0} must be set and non-empty")]
    MissingSecret(&'static str),

    /// Access and refresh secrets must be distinct keys
    #[error("access and refresh token secrets must differ")]
    IdenticalSecrets,

    /// Access token lifetime is not a positive integer
    #[error("ACCESS_TOKEN_HOURS must be a positive integer, got {0:?}")]
    InvalidAccessHours(String),
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for signing/verifying access tokens
    pub access_secret: String,
    /// Secret for signing/verifying refresh tokens (distinct from the
    /// access secret, so leaking one key space does not compromise the
    /// other)
    pub refresh_secret: String,
    /// Access token lifetime in hours (positive)
    pub access_hours: u64,
}

impl AuthConfig {
    /// Create a validated config
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        access_hours: u64,
    ) -> Result<Self, ConfigError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();

        if access_secret.is_empty() {
            return Err(ConfigError::MissingSecret(ENV_ACCESS_SECRET));
        }
        if refresh_secret.is_empty() {
            return Err(ConfigError::MissingSecret(ENV_REFRESH_SECRET));
        }
        if access_secret == refresh_secret {
            return Err(ConfigError::IdenticalSecrets);
        }
        if access_hours == 0 {
            return Err(ConfigError::InvalidAccessHours("0".to_string()));
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_hours,
        })
    }

    /// Load config from the environment
    ///
    /// Both secrets are required. `ACCESS_TOKEN_HOURS` defaults to 24
    /// when unset, but a set-and-invalid value is rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_secret = std::env::var(ENV_ACCESS_SECRET)
            .map_err(|_| ConfigError::MissingSecret(ENV_ACCESS_SECRET))?;
        let refresh_secret = std::env::var(ENV_REFRESH_SECRET)
            .map_err(|_| ConfigError::MissingSecret(ENV_REFRESH_SECRET))?;

        let access_hours = match std::env::var(ENV_ACCESS_HOURS) {
            Err(_) => DEFAULT_ACCESS_HOURS,
            Ok(raw) => match raw.parse::<u64>() {
                Ok(hours) if hours > 0 => hours,
                _ => return Err(ConfigError::InvalidAccessHours(raw)),
            },
        };

        Self::new(access_secret, refresh_secret, access_hours)
    }

    /// Access token lifetime in seconds (reported to callers)
    pub fn expires_in_secs(&self) -> u64 {
        self.access_hours * 3600
    }

    /// Access token TTL
    pub fn access_ttl(&self) -> Duration {
        Duration::hours(self.access_hours as i64)
    }

    /// Refresh token TTL (fixed, independent of `access_hours`)
    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(REFRESH_TOKEN_DAYS)
    }
}
