//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` out of process and parses its JSON report. The child is
//! killed if the probe outlives its timeout or the caller goes away.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::ExtractionError;
use crate::domain::model::*;
use crate::domain::rules::ReshapeRules;
use crate::ports::*;

/// Profile of the ffprobe prober
pub const FFPROBE_PROFILE: ProbeProfile = ProbeProfile {
    name: "ffprobe",
    date_source: DateSource::LocalChangeTime,
    bitrate_policy: BitratePolicy::ReportedOnly,
    uses_extension_hint: false,
};

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    executable: PathBuf,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter using the given executable
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    fn profile(&self) -> ProbeProfile {
        FFPROBE_PROFILE
    }

    async fn probe(&self, file_path: &Path, timeout: Duration) -> Result<ProbeResult, ExtractionError> {
        let child = Command::new(&self.executable)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(file_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ExtractionError::media(format!(
                    "Failed to launch {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result
                .map_err(|e| ExtractionError::media(format!("Failed to read ffprobe output: {}", e)))?,
            Err(_) => {
                warn!(path = %file_path.display(), "ffprobe exceeded {:?}; child killed", timeout);
                return Err(ExtractionError::media(format!("Probe timed out after {:?}", timeout)));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or("unrecognized media");
            return Err(ExtractionError::media(format!("ffprobe failed: {}", reason)));
        }

        let result = parse_report(&output.stdout)?;
        debug!(streams = result.stream_count, container = ?result.container, "ffprobe report parsed");
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeReport {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
}

#[derive(Debug, Deserialize)]
struct FfprobeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
    bit_rate: Option<String>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// Parse `ffprobe -print_format json -show_format -show_streams` output
pub fn parse_report(stdout: &[u8]) -> Result<ProbeResult, ExtractionError> {
    let report: FfprobeReport = serde_json::from_slice(stdout)
        .map_err(|e| ExtractionError::media(format!("Unreadable ffprobe report: {}", e)))?;

    if report.streams.is_empty() {
        return Err(ExtractionError::media("No streams found in media"));
    }
    let format = report
        .format
        .ok_or_else(|| ExtractionError::media("ffprobe report has no format section"))?;

    let video = report
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));

    let rotation = video.and_then(|stream| {
        stream
            .side_data_list
            .iter()
            .find_map(|side| side.rotation)
            .and_then(ReshapeRules::rotation_from_display_matrix)
            .or_else(|| {
                stream
                    .tags
                    .get("rotate")
                    .and_then(|value| value.trim().parse::<f64>().ok())
                    .filter(|deg| deg.is_finite())
                    .map(|deg| ReshapeRules::normalize_rotation(deg.round() as i32))
            })
    });

    Ok(ProbeResult {
        duration_ms: format
            .duration
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok())
            .map(|seconds| seconds * 1000.0),
        width: video.and_then(|s| s.width).filter(|w| *w > 0),
        height: video.and_then(|s| s.height).filter(|h| *h > 0),
        rotation,
        reported_bitrate: format
            .bit_rate
            .as_deref()
            .and_then(|b| b.trim().parse::<u64>().ok())
            .filter(|b| *b > 0),
        tags: format
            .tags
            .into_iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value))
            .collect(),
        container: format.format_name,
        stream_count: report.streams.len(),
    })
}
