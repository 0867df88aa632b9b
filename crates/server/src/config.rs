//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MERCADO_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`)
//! - `IDENTITY_PROVIDER_URL` - Base URL of the external identity provider
//! - `IDENTITY_PROVIDER_API_KEY` - API key for the identity provider
//!
//! ## Optional
//! - `MERCADO_HOST` - Bind address (default: 127.0.0.1)
//! - `MERCADO_PORT` - Listen port (default: 3000)
//! - `MERCADO_CLIENT_ORIGIN` - Allowed CORS origin (CORS disabled when unset)
//! - `MERCADO_PAGE_OVERFLOW` - `not-found` (default) or `empty`: whether a
//!   page past the end of a listing answers 404 or an empty 200

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

/// Behavior when a requested page starts past the end of a listing.
///
/// Source history disagrees on this contract, so it is a deployment choice
/// rather than a hardcoded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOverflow {
    /// Answer 404: no items exist at that offset.
    #[default]
    NotFound,
    /// Answer 200 with an empty array.
    Empty,
}

impl std::str::FromStr for PageOverflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-found" => Ok(Self::NotFound),
            "empty" => Ok(Self::Empty),
            other => Err(format!("expected 'not-found' or 'empty', got '{other}'")),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `SQLite` connection string.
    pub database_url: SecretString,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Allowed CORS origin for browser clients. CORS headers are omitted
    /// entirely when unset.
    pub client_origin: Option<String>,
    /// Identity provider connection settings.
    pub provider: ProviderConfig,
    /// Page-beyond-range behavior for list endpoints.
    pub page_overflow: PageOverflow,
}

/// External identity provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider's REST API.
    pub base_url: String,
    /// API key sent with every verification call.
    pub api_key: SecretString,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
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

        let database_url = get_database_url("MERCADO_DATABASE_URL")?;
        let host = get_env_or_default("MERCADO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MERCADO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("MERCADO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MERCADO_PORT".to_string(), e.to_string()))?;
        let client_origin = get_optional_env("MERCADO_CLIENT_ORIGIN");
        let page_overflow = match get_optional_env("MERCADO_PAGE_OVERFLOW") {
            None => PageOverflow::default(),
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("MERCADO_PAGE_OVERFLOW".to_string(), e))?,
        };

        let provider = ProviderConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            client_origin,
            provider,
            page_overflow,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ProviderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_required_env("IDENTITY_PROVIDER_URL")?,
            api_key: get_required_env("IDENTITY_PROVIDER_API_KEY").map(SecretString::from)?,
        })
    }
}

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

    #[test]
    fn test_page_overflow_parse() {
        assert_eq!("not-found".parse::<PageOverflow>().unwrap(), PageOverflow::NotFound);
        assert_eq!("empty".parse::<PageOverflow>().unwrap(), PageOverflow::Empty);
        assert!("both".parse::<PageOverflow>().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            client_origin: None,
            provider: ProviderConfig {
                base_url: "http://localhost:9099".to_string(),
                api_key: SecretString::from("test-key"),
            },
            page_overflow: PageOverflow::default(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_provider_config_debug_redacts_api_key() {
        let config = ProviderConfig {
            base_url: "http://localhost:9099".to_string(),
            api_key: SecretString::from("super_secret_api_key"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:9099"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }
}
