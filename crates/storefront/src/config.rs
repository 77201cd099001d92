//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TEEREX_STORE_PATH` - Store file location (default: teerex-store.json)
//! - `TEEREX_NOTICE_MS` - Notice display window in milliseconds (default: 3000)
//! - `TEEREX_CURRENCY` - Currency shown next to cart totals (default: INR)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use teerex_core::Currency;
use thiserror::Error;

use crate::notice::DEFAULT_NOTICE_WINDOW;
use crate::views::ViewSettings;

const DEFAULT_STORE_PATH: &str = "teerex-store.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Location of the `FileStore` document
    pub store_path: PathBuf,
    /// How long transient notices stay visible
    pub notice_window: Duration,
    /// Currency tag shown next to cart totals
    pub currency: Currency,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            notice_window: DEFAULT_NOTICE_WINDOW,
            currency: Currency::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let store_path = lookup("TEEREX_STORE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.store_path, PathBuf::from);

        let notice_window = match lookup("TEEREX_NOTICE_MS") {
            Some(raw) => parse_notice_window(&raw)?,
            None => defaults.notice_window,
        };

        let currency = lookup("TEEREX_CURRENCY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map_or(defaults.currency, Currency::new);

        Ok(Self {
            store_path,
            notice_window,
            currency,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Settings handed to every view.
    #[must_use]
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            notice_window: self.notice_window,
            currency: self.currency.clone(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_notice_window(raw: &str) -> Result<Duration, ConfigError> {
    let millis = raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("TEEREX_NOTICE_MS".to_string(), e.to_string())
    })?;
    if millis == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "TEEREX_NOTICE_MS".to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(millis))
}
