// Temp file adapter - Materializes request bytes for path-based probers

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::errors::ExtractionError;
use crate::domain::model::DateSource;
use crate::ports::*;
use crate::utils::time::TimeFormatter;

/// Default transient file name prefix
pub const DEFAULT_TEMP_PREFIX: &str = "vid_";

/// tempfile-backed store; every file it creates is unique and self-deleting
#[derive(Debug, Clone)]
pub struct TempFileStore {
    temp_dir: PathBuf,
    prefix: String,
}

impl TempFileStore {
    /// Create a store rooted at `temp_dir`, creating the directory if needed
    pub fn new(temp_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self, ExtractionError> {
        let temp_dir = temp_dir.into();
        fs::create_dir_all(&temp_dir).map_err(|e| {
            ExtractionError::file(format!(
                "Failed to create temp directory {}: {}",
                temp_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            temp_dir,
            prefix: prefix.into(),
        })
    }

    /// Default directory for transient files
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("vidmeta")
    }

    /// Directory transient files are created in
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }
}

impl TempStorePort for TempFileStore {
    fn materialize(
        &self,
        bytes: &[u8],
        extension: &str,
        date_source: DateSource,
    ) -> Result<MaterializedFile, ExtractionError> {
        let suffix = format!(".{}", extension);
        let mut guard = tempfile::Builder::new()
            .prefix(&self.prefix)
            .suffix(&suffix)
            .tempfile_in(&self.temp_dir)
            .map_err(|e| ExtractionError::file(format!("Failed to create temp file: {}", e)))?;

        // Any early return below drops `guard`, which deletes the file.
        write_fully(&mut guard, bytes)
            .map_err(|e| ExtractionError::file(format!("Failed to write to temp file: {}", e)))?;

        let metadata = guard
            .as_file()
            .metadata()
            .map_err(|e| ExtractionError::file(format!("Failed to read temp file metadata: {}", e)))?;

        let date = TimeFormatter::file_date(&metadata, date_source).unwrap_or_default();
        debug!(
            path = %guard.path().display(),
            file_size = metadata.len(),
            "Materialized request bytes"
        );

        Ok(MaterializedFile::new(guard, metadata.len(), date))
    }
}

fn write_fully(guard: &mut tempfile::NamedTempFile, bytes: &[u8]) -> std::io::Result<()> {
    guard.write_all(bytes)?;
    guard.flush()?;
    guard.as_file().sync_all()
}
