// Tracing log adapter - Structured logging using tracing crate

use tracing_subscriber::EnvFilter;

use crate::error::{VidMetaError, VidMetaResult};

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> VidMetaResult<Self> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(VidMetaError::config(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    /// Convert to tracing level
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse log format from string
    pub fn parse(format_str: &str) -> VidMetaResult<Self> {
        match format_str.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(VidMetaError::config(format!(
                "Invalid log format: {}. Valid formats: text, json",
                format_str
            ))),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. Events go to stderr so stdout stays
/// free for command output and channel responses. Calling this twice is an
/// error from the second call on.
pub fn init_logging(level: LogLevel, format: LogFormat) -> VidMetaResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| VidMetaError::LoggingInit {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(LogLevel::parse("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::parse("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::parse("verbose").is_err());
        assert!(LogLevel::Debug < LogLevel::Error);
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(LogFormat::parse("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::parse("Text").unwrap(), LogFormat::Text);
        assert!(LogFormat::parse("xml").is_err());
    }

    #[test]
    fn test_second_init_fails() {
        let _ = init_logging(LogLevel::Warn, LogFormat::Text);
        assert!(init_logging(LogLevel::Warn, LogFormat::Text).is_err());
    }
}
