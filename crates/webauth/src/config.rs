//! Validator configuration.
//!
//! Settings for the freshness window, key alias scheme and the time zone
//! used in error messages. Configuration is loaded from environment
//! variables with defaults matching the protocol's recommendations.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default maximum token age in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default tolerated clock disagreement in milliseconds.
pub const DEFAULT_MAX_SKEW_MS: u64 = 500;

/// Default key alias prefix.
pub const DEFAULT_KEY_PREFIX: &str = "webauth-pubkey";

/// Default zone for rendering timestamps.
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Maximum age of a response, in milliseconds.
    pub timeout_ms: u64,

    /// Maximum clock disagreement between WLS and WAA, in milliseconds.
    pub max_skew_ms: u64,

    /// Prefix joined with the response `kid` to form the key alias.
    pub key_prefix: String,

    /// IANA zone name used when rendering issue times in errors.
    pub time_zone: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_skew_ms: DEFAULT_MAX_SKEW_MS,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WEBAUTH_TIMEOUT_MS`: Maximum response age (default: 30000)
    /// - `WEBAUTH_MAX_SKEW_MS`: Tolerated clock skew (default: 500)
    /// - `WEBAUTH_KEY_PREFIX`: Key alias prefix (default: webauth-pubkey)
    /// - `WEBAUTH_TIME_ZONE`: Zone for error messages (default: UTC)
    ///
    /// Unparsable numbers fall back to the defaults. Call
    /// [`validate`](Self::validate) to check the rest.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();

        Self {
            timeout_ms: var("WEBAUTH_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_ms),
            max_skew_ms: var("WEBAUTH_MAX_SKEW_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_skew_ms),
            key_prefix: var("WEBAUTH_KEY_PREFIX").unwrap_or(default.key_prefix),
            time_zone: var("WEBAUTH_TIME_ZONE").unwrap_or(default.time_zone),
        }
    }

    /// Maximum response age as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Tolerated clock skew as a Duration.
    pub fn max_skew(&self) -> Duration {
        Duration::from_millis(self.max_skew_ms)
    }

    /// Resolve the configured time zone.
    pub fn time_zone(&self) -> Result<Tz, ConfigError> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "time_zone".to_string(),
                message: e.to_string(),
            })
    }

    /// Check that the configuration can be used to build a validator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "key_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        self.time_zone()?;
        Ok(())
    }
}
