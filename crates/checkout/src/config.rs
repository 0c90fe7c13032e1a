//! Checkout service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CHECKOUT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//! - `ADDRESS_VERIFY_ENDPOINT` - Base URL of the address-verification service
//! - `ADDRESS_VERIFY_API_KEY` - Verification service API key
//!
//! ## Optional
//! - `CHECKOUT_HOST` - Bind address (default: 127.0.0.1)
//! - `CHECKOUT_PORT` - Listen port (default: 3000)
//! - `ADDRESS_VERIFY_ENABLED` - Feature toggle (default: true)
//! - `ADDRESS_GRACE_PERIOD_DAYS` - Days before a declined or dismissed
//!   address is re-checked (default: 90)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout application configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Address verification service configuration
    pub verifier: VerifierConfig,
    /// Days before a declined or dismissed address is re-checked
    pub grace_period_days: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Address verification service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct VerifierConfig {
    /// Base URL of the verification service
    pub endpoint: Url,
    /// API key sent in every verification request
    pub api_key: SecretString,
    /// Feature toggle: when false, validation is skipped entirely and every
    /// attempt reports an indeterminate outcome
    pub enabled: bool,
}

impl std::fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CHECKOUT_DATABASE_URL")?;
        let host = get_env_or_default("CHECKOUT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHECKOUT_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CHECKOUT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHECKOUT_PORT".to_string(), e.to_string()))?;

        let verifier = VerifierConfig::from_env()?;
        let grace_period_days = get_env_or_default("ADDRESS_GRACE_PERIOD_DAYS", "90")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ADDRESS_GRACE_PERIOD_DAYS".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            verifier,
            grace_period_days,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl VerifierConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = get_required_env("ADDRESS_VERIFY_ENDPOINT")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ADDRESS_VERIFY_ENDPOINT".to_string(), e.to_string())
            })?;
        let api_key = SecretString::from(get_required_env("ADDRESS_VERIFY_API_KEY")?);
        let enabled = get_env_or_default("ADDRESS_VERIFY_ENABLED", "true")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ADDRESS_VERIFY_ENABLED".to_string(), e.to_string())
            })?;

        Ok(Self {
            endpoint,
            api_key,
            enabled,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> CheckoutConfig {
        CheckoutConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            verifier: VerifierConfig {
                endpoint: "https://verify.example.com/v1".parse().unwrap(),
                api_key: SecretString::from("kx-9ab3-super-secret"),
                enabled: true,
            },
            grace_period_days: 90,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_verifier_config_debug_redacts_api_key() {
        let config = test_config();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://verify.example.com/v1"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("kx-9ab3-super-secret"));
    }
}
