//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `THISTLE_API_BASE_URL` - Base URL of the remote catalog service
//!
//! ## Optional
//! - `THISTLE_DATA_DIR` - Directory for the file-backed cart store
//!   (when unset, hosts typically fall back to the in-memory store)
//! - `THISTLE_CURRENCY` - ISO 4217 display currency (default: USD)

use std::path::PathBuf;

use thiserror::Error;
use thistle_core::CurrencyCode;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the remote catalog service.
    pub api_base_url: Url,
    /// Directory for the file-backed cart store, if any.
    pub data_dir: Option<PathBuf>,
    /// Display currency for formatted prices.
    pub currency: CurrencyCode,
}

impl StorefrontConfig {
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

        let api_base_url = parse_base_url("THISTLE_API_BASE_URL", &get_required_env("THISTLE_API_BASE_URL")?)?;
        let data_dir = get_optional_env("THISTLE_DATA_DIR").map(PathBuf::from);
        let currency = parse_currency("THISTLE_CURRENCY", &get_env_or_default("THISTLE_CURRENCY", "USD"))?;

        Ok(Self {
            api_base_url,
            data_dir,
            currency,
        })
    }

    /// Build a configuration directly, for embedding hosts and tests.
    #[must_use]
    pub const fn new(api_base_url: Url, data_dir: Option<PathBuf>, currency: CurrencyCode) -> Self {
        Self {
            api_base_url,
            data_dir,
            currency,
        }
    }
}

/// Parse and normalize a base URL. A trailing slash is required for
/// `Url::join` to treat the last path segment as a directory.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let normalized = if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{value}/")
    };
    Url::parse(&normalized).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_currency(key: &str, value: &str) -> Result<CurrencyCode, ConfigError> {
    CurrencyCode::parse(value).ok_or_else(|| {
        ConfigError::InvalidEnvVar(key.to_string(), format!("unsupported currency '{value}'"))
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
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
    fn test_parse_base_url_appends_trailing_slash() {
        let url = parse_base_url("TEST_VAR", "http://localhost:4000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/");
        // join must extend the path, not replace the last segment
        assert_eq!(
            url.join("products").unwrap().as_str(),
            "http://localhost:4000/api/products"
        );
    }

    #[test]
    fn test_parse_base_url_invalid() {
        let err = parse_base_url("TEST_VAR", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(
            parse_currency("TEST_VAR", "eur").unwrap(),
            CurrencyCode::EUR
        );
        assert!(parse_currency("TEST_VAR", "JPY").is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("THISTLE_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: THISTLE_API_BASE_URL"
        );
    }
}
