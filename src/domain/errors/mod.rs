// Domain errors - Error taxonomy for metadata extraction

use thiserror::Error;

/// Failure of a metadata extraction request.
///
/// Each variant carries a human-readable message. The variant itself is the
/// machine-readable kind that crosses the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Missing or malformed request field; caller bug, not retryable as-is
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),
    /// Temp file creation, write or read failure; environmental
    #[error("FileError: {0}")]
    FileError(String),
    /// Prober could not initialize or could not extract stream info
    #[error("MediaError: {0}")]
    MediaError(String),
}

impl ExtractionError {
    /// Short machine-readable kind tag
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::InvalidArgument(_) => "InvalidArgument",
            ExtractionError::FileError(_) => "FileError",
            ExtractionError::MediaError(_) => "MediaError",
        }
    }

    /// Human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            ExtractionError::InvalidArgument(msg)
            | ExtractionError::FileError(msg)
            | ExtractionError::MediaError(msg) => msg,
        }
    }

    /// Whether an identical request could succeed later
    pub fn is_transient(&self) -> bool {
        matches!(self, ExtractionError::FileError(_))
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ExtractionError::InvalidArgument(msg.into())
    }

    pub(crate) fn file(msg: impl Into<String>) -> Self {
        ExtractionError::FileError(msg.into())
    }

    pub(crate) fn media(msg: impl Into<String>) -> Self {
        ExtractionError::MediaError(msg.into())
    }
}
