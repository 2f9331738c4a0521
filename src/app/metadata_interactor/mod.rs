// Metadata interactor - Orchestrates the metadata extraction use case

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::ExtractionError;
use crate::domain::model::*;
use crate::domain::rules::{RequestRules, ReshapeRules};
use crate::ports::*;

/// Limits applied to every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSettings {
    pub probe_timeout: Duration,
    pub max_input_bytes: u64,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
            max_input_bytes: 2 * 1024 * 1024 * 1024,
        }
    }
}

/// Interactor for the metadata extraction use case.
///
/// validate → materialize → probe → reshape; the transient file is released
/// on every path out of [`MetadataInteractor::extract_metadata`].
pub struct MetadataInteractor {
    probe_port: Arc<dyn ProbePort>,
    temp_store: Arc<dyn TempStorePort>,
    settings: ExtractionSettings,
}

impl MetadataInteractor {
    /// Create new metadata interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        temp_store: Arc<dyn TempStorePort>,
        settings: ExtractionSettings,
    ) -> Self {
        Self {
            probe_port,
            temp_store,
            settings,
        }
    }

    /// Profile of the prober backing this interactor
    pub fn profile(&self) -> ProbeProfile {
        self.probe_port.profile()
    }

    /// Limits applied to each request
    pub fn settings(&self) -> ExtractionSettings {
        self.settings
    }

    /// Decode an untyped argument map and extract its metadata
    pub async fn extract_from_value(&self, args: &Value) -> Result<VideoMetadataRecord, ExtractionError> {
        let request = MetadataRequest::from_value(args)?;
        self.extract_metadata(request).await
    }

    /// Extract metadata from an in-memory video
    #[instrument(
        name = "extract_metadata",
        skip_all,
        fields(bytes = request.video_bytes.len(), extension = %request.extension, prober = self.probe_port.profile().name)
    )]
    pub async fn extract_metadata(&self, request: MetadataRequest) -> Result<VideoMetadataRecord, ExtractionError> {
        let extension = RequestRules::validate(&request, self.settings.max_input_bytes)?;
        let profile = self.probe_port.profile();
        info!(prober = profile.name, "Extracting metadata");

        let store = Arc::clone(&self.temp_store);
        let bytes = request.video_bytes;
        let materialized = tokio::task::spawn_blocking(move || {
            store.materialize(&bytes, &extension, profile.date_source)
        })
        .await
        .map_err(|e| ExtractionError::file(format!("Materialization worker failed: {}", e)))??;

        let timeout = self.settings.probe_timeout;
        let probed = match tokio::time::timeout(timeout, self.probe_port.probe(materialized.path(), timeout)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Probe exceeded {:?}", timeout);
                return Err(ExtractionError::media(format!("Probe timed out after {:?}", timeout)));
            }
        };
        debug!(
            streams = probed.stream_count,
            container = ?probed.container,
            duration_ms = ?probed.duration_ms,
            "Probe completed"
        );

        let record = ReshapeRules::reshape(&probed, materialized.file_size, &materialized.date, &profile);
        materialized.release();

        info!(
            file_size = record.file_size,
            width = record.width,
            height = record.height,
            duration_ms = record.duration,
            "Metadata extracted"
        );
        Ok(record)
    }
}
