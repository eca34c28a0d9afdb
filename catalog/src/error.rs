//! Error types for catalog loading.

use thiserror::Error;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON syntax error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML syntax error.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Well-formed document that is not a recognizable catalog.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
