// Ports - Interface definitions (contracts)

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::domain::errors::ExtractionError;
use crate::domain::model::*;

/// Port for media file probing.
///
/// One implementation exists per native prober. The extraction service is
/// written once against this trait; the concrete variant is chosen at build
/// time (cargo features) and wiring time (configuration), or injected.
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Capabilities this prober declares
    fn profile(&self) -> ProbeProfile;

    /// Probe a file on disk.
    ///
    /// Implementations must give up with `MediaError` once `timeout` elapses
    /// and must release every handle they acquired before returning.
    async fn probe(&self, file_path: &Path, timeout: Duration) -> Result<ProbeResult, ExtractionError>;
}

/// Port for materializing request bytes to a transient file
pub trait TempStorePort: Send + Sync {
    /// Write `bytes` to a fresh, uniquely named file ending in `.{extension}`
    fn materialize(
        &self,
        bytes: &[u8],
        extension: &str,
        date_source: DateSource,
    ) -> Result<MaterializedFile, ExtractionError>;
}

/// A transient file holding request bytes.
///
/// The file is deleted when this value is dropped, on every exit path.
#[derive(Debug)]
pub struct MaterializedFile {
    guard: NamedTempFile,
    /// Byte length as persisted on disk
    pub file_size: u64,
    /// Formatted file timestamp, empty when unavailable
    pub date: String,
}

impl MaterializedFile {
    pub fn new(guard: NamedTempFile, file_size: u64, date: String) -> Self {
        Self {
            guard,
            file_size,
            date,
        }
    }

    /// Path of the transient file
    pub fn path(&self) -> &Path {
        self.guard.path()
    }

    /// Delete the file now, reporting failures that `Drop` would swallow
    pub fn release(self) {
        let path = self.guard.path().to_path_buf();
        if let Err(e) = self.guard.close() {
            warn!(path = %path.display(), error = %e, "Failed to delete transient file");
        }
    }
}
