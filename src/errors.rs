//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deimap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Source table unreadable or unparseable
    #[error("Load error: {message}")]
    Load {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A required column is absent from the header row
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// A dimension name not in the closed enumeration
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// A score field name not in the closed enumeration
    #[error("Unknown score field: {0}")]
    UnknownField(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filter specification errors (malformed --filter arguments etc.)
    #[error("Filter error: {0}")]
    Filter(String),

    /// Wrapped external errors
    #[error(transparent)]
    External(#[from] anyhow::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV errors
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a load error wrapping an IO failure
    pub fn load_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Load {
            message: source.to_string(),
            path: Some(path.into()),
            source: Some(source),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
