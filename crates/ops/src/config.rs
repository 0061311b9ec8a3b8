//! Ops service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `OPS_DATABASE_URL` - `PostgreSQL` connection string; `DATABASE_URL`
//!   (set by Fly.io postgres attach) works as a fallback
//!
//! ## Optional
//! - `OPS_HOST` - Bind address (default: 127.0.0.1)
//! - `OPS_PORT` - Listen port (default: 3002)
//! - `DEFAULT_SUPPLY_DAYS` - Days-of-supply target when a merchant has no
//!   setting (default: 30)
//! - `REORDER_SAFETY_DAYS` - Safety buffer in days when a merchant has no
//!   setting (default: 7)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)
//!
//! A variable that is set but fails to parse is a hard error, never a silent
//! fallback to the default.

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_SUPPLY_DAYS: i64 = 30;
const DEFAULT_SAFETY_DAYS: i64 = 7;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Ops application configuration.
#[derive(Debug, Clone)]
pub struct OpsConfig {
    /// `PostgreSQL` connection URL (contains the password).
    pub database_url: SecretString,
    /// Bind address.
    pub host: IpAddr,
    /// Listen port.
    pub port: u16,
    /// Environment-level reorder fallbacks, used when a merchant has no
    /// settings row.
    pub reorder_defaults: ReorderDefaults,
    /// Sentry DSN; error tracking is disabled when unset.
    pub sentry_dsn: Option<String>,
    /// Sentry environment name ("development", "production", ...).
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0).
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0).
    pub sentry_traces_sample_rate: f32,
}

/// Environment-level reorder fallbacks.
///
/// Read once at boot and passed into the aggregation services explicitly;
/// nothing deeper in the stack reads ambient environment state.
#[derive(Debug, Clone, Copy)]
pub struct ReorderDefaults {
    /// Target days of supply when reordering.
    pub default_supply_days: i64,
    /// Safety buffer in days.
    pub reorder_safety_days: i64,
}

impl Default for ReorderDefaults {
    fn default() -> Self {
        Self {
            default_supply_days: DEFAULT_SUPPLY_DAYS,
            reorder_safety_days: DEFAULT_SAFETY_DAYS,
        }
    }
}

impl ReorderDefaults {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            default_supply_days: parse_env("DEFAULT_SUPPLY_DAYS", DEFAULT_SUPPLY_DAYS)?,
            reorder_safety_days: parse_env("REORDER_SAFETY_DAYS", DEFAULT_SAFETY_DAYS)?,
        })
    }
}

impl OpsConfig {
    /// Load configuration from the environment, reading a `.env` file first
    /// when one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the database URL is missing or any set
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: database_url()?,
            host: parse_env("OPS_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_env("OPS_PORT", 3002)?,
            reorder_defaults: ReorderDefaults::from_env()?,
            sentry_dsn: env_var("SENTRY_DSN"),
            sentry_environment: env_var("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", 1.0)?,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// The service-specific URL wins; the generic `DATABASE_URL` is the fallback.
fn database_url() -> Result<SecretString, ConfigError> {
    env_var("OPS_DATABASE_URL")
        .or_else(|| env_var("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar("OPS_DATABASE_URL".to_string()))
}

/// Parse an environment variable, using `default` when it is unset. A set
/// value that fails to parse is an error.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_defaults() {
        let defaults = ReorderDefaults::default();
        assert_eq!(defaults.default_supply_days, 30);
        assert_eq!(defaults.reorder_safety_days, 7);
    }

    #[test]
    fn test_socket_addr() {
        let config = OpsConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3002,
            reorder_defaults: ReorderDefaults::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        // Deliberately unset variable name.
        let value: i64 = parse_env("RESTOCK_TEST_UNSET_SUPPLY_DAYS", 30).unwrap();
        assert_eq!(value, 30);
    }
}
