// Domain rules - Validation and field normalization policies

use std::collections::BTreeMap;

use crate::domain::errors::ExtractionError;
use crate::domain::model::*;

#[cfg(test)]
mod tests;

/// Longest extension hint accepted for the transient file name
pub const MAX_EXTENSION_LEN: usize = 16;

/// Tag keys consulted for each record field, in priority order
const TITLE_KEYS: &[&str] = &["title"];
const ARTIST_KEYS: &[&str] = &["artist"];
const AUTHOR_KEYS: &[&str] = &["author"];
const ALBUM_KEYS: &[&str] = &["album"];
const ALBUM_ARTIST_KEYS: &[&str] = &["album_artist", "albumartist", "album artist"];

/// Request validation rules
pub struct RequestRules;

impl RequestRules {
    /// Validate a request and return the normalized extension.
    ///
    /// Nothing is written to disk until this passes.
    pub fn validate(request: &MetadataRequest, max_input_bytes: u64) -> Result<String, ExtractionError> {
        if request.video_bytes.is_empty() {
            return Err(ExtractionError::invalid("Empty videoBytes"));
        }
        if request.video_bytes.len() as u64 > max_input_bytes {
            return Err(ExtractionError::invalid(format!(
                "videoBytes exceeds limit of {} bytes",
                max_input_bytes
            )));
        }
        Self::normalize_extension(&request.extension)
    }

    /// Strip surrounding whitespace and a leading dot, then require a short
    /// alphanumeric token so the hint can never escape the temp directory.
    pub fn normalize_extension(extension: &str) -> Result<String, ExtractionError> {
        let trimmed = extension.trim();
        let token = trimmed.strip_prefix('.').unwrap_or(trimmed);

        let valid = !token.is_empty()
            && token.len() <= MAX_EXTENSION_LEN
            && token.chars().all(|c| c.is_ascii_alphanumeric());

        if valid {
            Ok(token.to_string())
        } else {
            Err(ExtractionError::invalid("Invalid extension format"))
        }
    }
}

/// Field reshaping rules applied to probe output
pub struct ReshapeRules;

impl ReshapeRules {
    /// Build the canonical record, defaulting every field the prober left out
    pub fn reshape(
        probe: &ProbeResult,
        file_size: u64,
        date: &str,
        profile: &ProbeProfile,
    ) -> VideoMetadataRecord {
        let duration = probe
            .duration_ms
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .unwrap_or(0.0);

        let bitrate = match profile.bitrate_policy {
            BitratePolicy::DeriveFromSize => Self::derive_bitrate(file_size, duration),
            BitratePolicy::ReportedOnly => probe.reported_bitrate.unwrap_or(0),
        };

        VideoMetadataRecord {
            file_size,
            duration,
            width: probe.width.unwrap_or(0),
            height: probe.height.unwrap_or(0),
            rotation: probe.rotation.map(Self::normalize_rotation).unwrap_or(0),
            bitrate,
            title: Self::pick_tag(&probe.tags, TITLE_KEYS),
            artist: Self::pick_tag(&probe.tags, ARTIST_KEYS),
            author: Self::pick_tag(&probe.tags, AUTHOR_KEYS),
            album: Self::pick_tag(&probe.tags, ALBUM_KEYS),
            album_artist: Self::pick_tag(&probe.tags, ALBUM_ARTIST_KEYS),
            date: date.to_string(),
        }
    }

    /// Average bits per second from the persisted size.
    ///
    /// Only defined for a known positive duration; 0 otherwise.
    pub fn derive_bitrate(file_size: u64, duration_ms: f64) -> u64 {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return 0;
        }
        let bits = file_size as f64 * 8.0;
        (bits / (duration_ms / 1000.0)).floor() as u64
    }

    /// Fold any clockwise angle into `0..360`
    pub fn normalize_rotation(degrees: i32) -> i32 {
        degrees.rem_euclid(360)
    }

    /// Convert a display-matrix angle (counterclockwise, possibly fractional)
    /// into clockwise whole degrees
    pub fn rotation_from_display_matrix(theta: f64) -> Option<i32> {
        if !theta.is_finite() {
            return None;
        }
        Some(Self::normalize_rotation((-theta).round() as i32))
    }

    /// First non-empty tag among `keys`, compared case-insensitively
    pub fn pick_tag(tags: &BTreeMap<String, String>, keys: &[&str]) -> String {
        keys.iter()
            .find_map(|key| {
                tags.iter()
                    .find(|(name, value)| name.eq_ignore_ascii_case(key) && !value.trim().is_empty())
                    .map(|(_, value)| value.trim().to_string())
            })
            .unwrap_or_default()
    }
}
