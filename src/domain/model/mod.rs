// Domain models - Core types and data structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::ExtractionError;

#[cfg(test)]
mod tests;

/// Request field carrying the encoded video
pub const VIDEO_BYTES_FIELD: &str = "videoBytes";
/// Request field carrying the file extension hint
pub const EXTENSION_FIELD: &str = "extension";

/// Raw video bytes plus the extension hint used to name the transient file
#[derive(Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    pub video_bytes: Vec<u8>,
    pub extension: String,
}

impl MetadataRequest {
    /// Create a typed request
    pub fn new(video_bytes: Vec<u8>, extension: impl Into<String>) -> Self {
        Self {
            video_bytes,
            extension: extension.into(),
        }
    }

    /// Decode a request from an untyped argument map.
    ///
    /// `videoBytes` must be an array of integers in `0..=255` and `extension`
    /// must be a string. Anything else is an `InvalidArgument`.
    pub fn from_value(args: &Value) -> Result<Self, ExtractionError> {
        let map = args
            .as_object()
            .ok_or_else(|| ExtractionError::invalid("Expected an argument map"))?;

        let raw_bytes = map
            .get(VIDEO_BYTES_FIELD)
            .filter(|value| !value.is_null())
            .ok_or_else(|| ExtractionError::invalid("Missing videoBytes"))?;
        let video_bytes = decode_bytes(raw_bytes)
            .ok_or_else(|| ExtractionError::invalid("Invalid videoBytes format"))?;

        let extension = map
            .get(EXTENSION_FIELD)
            .filter(|value| !value.is_null())
            .ok_or_else(|| ExtractionError::invalid("Missing extension"))?
            .as_str()
            .ok_or_else(|| ExtractionError::invalid("Invalid extension format"))?;

        Ok(Self::new(video_bytes, extension))
    }
}

impl std::fmt::Debug for MetadataRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataRequest")
            .field("video_bytes", &format_args!("<{} bytes>", self.video_bytes.len()))
            .field("extension", &self.extension)
            .finish()
    }
}

fn decode_bytes(value: &Value) -> Option<Vec<u8>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
        .collect()
}

/// Canonical metadata record returned for every successful request.
///
/// Serializes with exactly twelve camelCase keys, all always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadataRecord {
    /// Byte length of the materialized file
    pub file_size: u64,
    /// Playback duration in milliseconds, 0 if unknown
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    /// Clockwise display rotation in degrees, `0..360`
    pub rotation: i32,
    /// Average bits per second, 0 if neither reported nor derivable
    pub bitrate: u64,
    pub title: String,
    pub artist: String,
    pub author: String,
    pub album: String,
    pub album_artist: String,
    /// `YYYY-MM-DD HH:MM:SS` from the materialized file, or empty
    pub date: String,
}

/// Structural output of a prober before reshaping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    pub duration_ms: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Clockwise degrees, not yet normalized
    pub rotation: Option<i32>,
    /// Container-level bitrate as reported by the prober
    pub reported_bitrate: Option<u64>,
    /// Container tags keyed by lowercase name
    pub tags: BTreeMap<String, String>,
    pub container: Option<String>,
    pub stream_count: usize,
}

/// Which file timestamp populates the record's `date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// Inode change time, rendered in local time
    LocalChangeTime,
    /// Birth time, rendered in UTC
    UtcCreationTime,
}

/// How the record's `bitrate` is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BitratePolicy {
    /// `file_size * 8 / duration_seconds`, 0 when duration is unknown
    DeriveFromSize,
    /// Container bitrate as reported by the prober, 0 when absent
    ReportedOnly,
}

/// Capabilities a prober variant declares to the extraction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeProfile {
    pub name: &'static str,
    pub date_source: DateSource,
    pub bitrate_policy: BitratePolicy,
    /// Whether the demuxer is picked from the file extension rather than content
    pub uses_extension_hint: bool,
}
