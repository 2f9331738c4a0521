//! Timestamp formatting utilities

use std::fs::Metadata;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::domain::model::DateSource;

/// Format used for the record's `date` field
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp formatter for materialized files
pub struct TimeFormatter;

impl TimeFormatter {
    /// Render the file timestamp selected by `source`, or `None` when the
    /// platform exposes neither that timestamp nor a modification time
    pub fn file_date(metadata: &Metadata, source: DateSource) -> Option<String> {
        match source {
            DateSource::LocalChangeTime => {
                Self::change_time(metadata).map(|t| t.format(RECORD_DATE_FORMAT).to_string())
            }
            DateSource::UtcCreationTime => metadata
                .created()
                .or_else(|_| metadata.modified())
                .ok()
                .map(|t| DateTime::<Utc>::from(t).format(RECORD_DATE_FORMAT).to_string()),
        }
    }

    #[cfg(unix)]
    fn change_time(metadata: &Metadata) -> Option<DateTime<Local>> {
        use std::os::unix::fs::MetadataExt;

        let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
        Local.timestamp_opt(metadata.ctime(), nanos).single()
    }

    // No inode change time off unix; modification time is the closest stand-in.
    #[cfg(not(unix))]
    fn change_time(metadata: &Metadata) -> Option<DateTime<Local>> {
        metadata.modified().ok().map(DateTime::<Local>::from)
    }

    /// Format milliseconds as HH:MM:SS.ms for human-readable output
    pub fn format_millis(millis: f64) -> String {
        let seconds = (millis.max(0.0)) / 1000.0;
        let hours = (seconds / 3600.0) as u32;
        let minutes = ((seconds % 3600.0) / 60.0) as u32;
        let secs = (seconds % 60.0) as u32;
        let milliseconds = ((seconds % 1.0) * 1000.0).round().min(999.0) as u32;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, secs, milliseconds)
        }
    }
}
