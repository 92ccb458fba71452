use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents errors raised while loading or reloading the product catalog.
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents configuration-related errors (e.g., unusable environment variables).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("JSON error: {}", err))
    }
}
