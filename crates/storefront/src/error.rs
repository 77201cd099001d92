//! Unified error handling.
//!
//! Provides a unified `AppError` type for everything a view intent can
//! return. Rejections the user should see (stock limit, checkout rules) are
//! told apart from store failures so front ends can render the former as a
//! notice and log the latter.

use thiserror::Error;

use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store backend failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A cart operation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout validation failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A page failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

impl AppError {
    /// Whether this is a rejection shown to the user as a notice.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        match self {
            Self::Cart(err) => err.is_user_facing(),
            Self::Checkout(_) => true,
            Self::Store(_) | Self::Config(_) | Self::Render(_) => false,
        }
    }

    /// Process exit code for command-line front ends.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_user_facing() { 1 } else { 2 }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
