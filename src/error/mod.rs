//! Error handling module for VidMeta

use thiserror::Error;

use crate::domain::errors::ExtractionError;

/// Main error type for VidMeta operations outside a single extraction
#[derive(Error, Debug)]
pub enum VidMetaError {
    /// Extraction request failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Logging could not be installed
    #[error("Failed to initialize logging: {message}")]
    LoggingInit { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML error
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl VidMetaError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        VidMetaError::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for VidMeta operations
pub type VidMetaResult<T> = std::result::Result<T, VidMetaError>;
