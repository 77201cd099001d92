//! CLI error type.

use thiserror::Error;

use teerex_storefront::AppError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Whether the error is a rejection already shown on the rendered page.
    pub const fn is_user_facing(&self) -> bool {
        match self {
            Self::App(e) => e.is_user_facing(),
            _ => false,
        }
    }

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::App(e) => e.exit_code(),
            _ => 2,
        }
    }
}
