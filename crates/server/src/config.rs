//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCKROOM_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://stockroom.db?mode=rwc`; the generic `DATABASE_URL`
//!   is honored as a fallback)
//! - `STOCKROOM_HOST` - Bind address (default: 127.0.0.1)
//! - `STOCKROOM_PORT` - Listen port (default: 3000)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Database URL used when no environment variable overrides it.
const DEFAULT_DATABASE_URL: &str = "sqlite://stockroom.db?mode=rwc";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection URL (may contain credentials when pointed at a
    /// remote store, so it is treated as a secret)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOCKROOM_DATABASE_URL");
        let host = get_env_or_default("STOCKROOM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKROOM_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("STOCKROOM_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKROOM_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            database_url,
            host,
            port,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the database URL, falling back to the generic `DATABASE_URL` and then
/// to the local `SQLite` file default.
fn get_database_url(primary_key: &str) -> SecretString {
    if let Ok(value) = std::env::var(primary_key) {
        return SecretString::from(value);
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return SecretString::from(value);
    }
    SecretString::from(DEFAULT_DATABASE_URL)
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_database_url_default() {
        let url = get_database_url("STOCKROOM_TEST_UNSET_VAR");
        // Falls back to DATABASE_URL if the process has one, otherwise the
        // local file default; either way it must be a sqlite URL.
        assert!(url.expose_secret().starts_with("sqlite"));
    }

    #[test]
    fn test_env_or_default() {
        assert_eq!(
            get_env_or_default("STOCKROOM_TEST_UNSET_VAR", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_config_debug_redacts_database_url() {
        let config = ServerConfig {
            database_url: SecretString::from("sqlite://secret-path/db.sqlite"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("secret-path"));
    }
}
