//! Admin panel configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `THISTLE_API_BASE_URL` - Base URL of the remote catalog service
//! - `THISTLE_ADMIN_TOKEN` - Bearer token for admin API calls
//!
//! The base URL variable is shared with the storefront; both panels talk
//! to the same service.

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum AdminConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin panel configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct AdminConfig {
    /// Base URL of the remote catalog service.
    pub api_base_url: Url,
    /// Bearer token for admin API calls.
    pub admin_token: SecretString,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("admin_token", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `AdminConfigError` if required variables are missing or
    /// invalid.
    pub fn from_env() -> Result<Self, AdminConfigError> {
        let _ = dotenvy::dotenv();

        let raw_url = get_required_env("THISTLE_API_BASE_URL")?;
        let normalized = if raw_url.ends_with('/') {
            raw_url
        } else {
            format!("{raw_url}/")
        };
        let api_base_url = Url::parse(&normalized).map_err(|e| {
            AdminConfigError::InvalidEnvVar("THISTLE_API_BASE_URL".to_string(), e.to_string())
        })?;

        let admin_token = SecretString::from(get_required_env("THISTLE_ADMIN_TOKEN")?);

        Ok(Self {
            api_base_url,
            admin_token,
        })
    }

    /// Build a configuration directly, for embedding hosts and tests.
    #[must_use]
    pub const fn new(api_base_url: Url, admin_token: SecretString) -> Self {
        Self {
            api_base_url,
            admin_token,
        }
    }
}

fn get_required_env(key: &str) -> Result<String, AdminConfigError> {
    std::env::var(key).map_err(|_| AdminConfigError::MissingEnvVar(key.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let config = AdminConfig::new(
            Url::parse("http://localhost:4000/api/").unwrap(),
            SecretString::from("very-secret-token"),
        );
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very-secret-token"));
    }
}
