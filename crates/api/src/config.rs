//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARTWHEEL_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `CARTWHEEL_HOST` - Bind address (default: 127.0.0.1)
//! - `CARTWHEEL_PORT` - Listen port (default: 8000)
//! - `CARTWHEEL_PAGE_SIZE` - Default page size for list endpoints (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Default page size for paginated list endpoints
    pub page_size: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if a required variable is absent,
    /// or `ConfigError::InvalidEnvVar` if a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require_env("CARTWHEEL_DATABASE_URL")?.into();

        let host = parse_env("CARTWHEEL_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env("CARTWHEEL_PORT", 8000)?;
        let page_size = parse_env("CARTWHEEL_PAGE_SIZE", 10)?;

        Ok(Self {
            database_url,
            host,
            port,
            page_size,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Read a required environment variable.
fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Read an optional environment variable and parse it, falling back to a
/// default when absent.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_owned(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_var_is_reported_by_name() {
        let err = require_env("CARTWHEEL_TEST_DEFINITELY_UNSET").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name.contains("UNSET")));
    }

    #[test]
    fn parse_env_falls_back_to_default() {
        let port: u16 = parse_env("CARTWHEEL_TEST_DEFINITELY_UNSET_PORT", 8000).unwrap();
        assert_eq!(port, 8000);
    }
}
