// Probe LibAV adapter - In-process media probing using libavformat

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::domain::errors::ExtractionError;
use crate::domain::model::*;
use crate::domain::rules::ReshapeRules;
use crate::ports::*;

static FFMPEG_INIT: OnceCell<()> = OnceCell::new();

/// Profile of the libav prober
pub const LIBAV_PROFILE: ProbeProfile = ProbeProfile {
    name: "libav",
    date_source: DateSource::UtcCreationTime,
    bitrate_policy: BitratePolicy::DeriveFromSize,
    uses_extension_hint: false,
};

/// Initialize FFmpeg once per process.
///
/// Safe to call concurrently; a failed attempt is not cached, so a later call
/// retries.
pub fn ensure_initialized() -> Result<(), ExtractionError> {
    FFMPEG_INIT
        .get_or_try_init(|| {
            ffmpeg::init()
                .map_err(|e| ExtractionError::media(format!("Failed to initialize FFmpeg: {}", e)))?;
            ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Error);
            debug!("FFmpeg initialized");
            Ok(())
        })
        .map(|_| ())
}

/// LibAV-based media probing adapter
#[derive(Debug, Default, Clone)]
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    /// Create new LibAV probing adapter
    pub fn new() -> Self {
        Self
    }

    /// Open the container, read stream info, and release the context before
    /// returning
    fn probe_blocking(path: &Path, timeout: Duration) -> Result<ProbeResult, ExtractionError> {
        ensure_initialized()?;

        // A timeout too large to represent means no deadline.
        let deadline = Instant::now().checked_add(timeout);
        let ictx = ffmpeg::format::input_with_interrupt(&path, move || deadline_passed(deadline))
            .map_err(|e| {
                if deadline_passed(deadline) {
                    ExtractionError::media(format!("Probe timed out after {:?}", timeout))
                } else {
                    ExtractionError::media(format!("Failed to open media: {}", e))
                }
            })?;

        let stream_count = ictx.nb_streams() as usize;
        if stream_count == 0 {
            return Err(ExtractionError::media("No streams found in media"));
        }

        let duration_ms = match ictx.duration() {
            us if us > 0 => Some(us as f64 * 1000.0 / f64::from(ffmpeg::ffi::AV_TIME_BASE)),
            _ => None,
        };
        let reported_bitrate = u64::try_from(ictx.bit_rate()).ok().filter(|b| *b > 0);

        let tags: BTreeMap<String, String> = ictx
            .metadata()
            .iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value.to_string()))
            .collect();

        let (width, height, rotation) = match ictx.streams().best(ffmpeg::media::Type::Video) {
            Some(stream) => {
                let (width, height) = frame_size(&stream.parameters());
                let rotation = display_rotation(&stream.parameters())
                    .or_else(|| rotate_tag(&stream.metadata()));
                (width, height, rotation)
            }
            None => {
                warn!(path = %path.display(), "No video stream found; dimensions default to 0");
                (None, None, None)
            }
        };

        Ok(ProbeResult {
            duration_ms,
            width,
            height,
            rotation,
            reported_bitrate,
            tags,
            container: Some(ictx.format().name().to_string()),
            stream_count,
        })
    }
}

#[async_trait]
impl ProbePort for ProbeLibavAdapter {
    fn profile(&self) -> ProbeProfile {
        LIBAV_PROFILE
    }

    async fn probe(&self, file_path: &Path, timeout: Duration) -> Result<ProbeResult, ExtractionError> {
        let path: PathBuf = file_path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::probe_blocking(&path, timeout))
            .await
            .map_err(|e| ExtractionError::media(format!("Probe worker failed: {}", e)))?
    }
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

fn positive(value: i32) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v > 0)
}

/// Coded frame size straight from the codec parameters; no decoder is opened.
fn frame_size(params: &ffmpeg::codec::Parameters) -> (Option<u32>, Option<u32>) {
    // SAFETY: `params` borrows a live stream of an open input context.
    let (width, height) = unsafe {
        let raw = params.as_ptr();
        ((*raw).width, (*raw).height)
    };
    (positive(width), positive(height))
}

/// Clockwise rotation from the display-matrix side data, if present
fn display_rotation(params: &ffmpeg::codec::Parameters) -> Option<i32> {
    // SAFETY: side data pointers belong to the codec parameters and are only
    // read while `params` is borrowed; the size check guards the 3x3 matrix read.
    let theta = unsafe {
        let raw = params.as_ptr();
        let side = ffmpeg::ffi::av_packet_side_data_get(
            (*raw).coded_side_data,
            (*raw).nb_coded_side_data,
            ffmpeg::ffi::AVPacketSideDataType::AV_PKT_DATA_DISPLAYMATRIX,
        );
        if side.is_null() || (*side).data.is_null() || ((*side).size as usize) < 9 * std::mem::size_of::<i32>() {
            return None;
        }
        ffmpeg::ffi::av_display_rotation_get((*side).data as *const i32)
    };
    ReshapeRules::rotation_from_display_matrix(theta)
}

/// Legacy `rotate` stream tag, already clockwise
fn rotate_tag(metadata: &ffmpeg::DictionaryRef<'_>) -> Option<i32> {
    metadata
        .get("rotate")
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|deg| deg.is_finite())
        .map(|deg| ReshapeRules::normalize_rotation(deg.round() as i32))
}
