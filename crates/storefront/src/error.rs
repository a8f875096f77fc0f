//! Unified error handling for the storefront controller.
//!
//! Controller entry points return `Result<T, AppError>`. Cart constraint
//! violations are user-facing and never corrupt persisted state; transport
//! failures abort only the in-flight operation, leaving prior committed
//! state untouched so the caller can simply re-invoke. Nothing here is
//! fatal to the process.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart constraint violation (user-facing).
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Remote catalog service call failed.
    #[error("Catalog service error: {0}")]
    Api(#[from] ApiError),

    /// Configuration failed to load or validate.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Checkout was attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,
}

impl AppError {
    /// Whether this error should be shown to the shopper as-is.
    ///
    /// Cart constraint violations and empty-cart checkouts are phrased for
    /// end users; transport and configuration failures are not.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Cart(_) | Self::EmptyCart)
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
