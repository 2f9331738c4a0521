use std::sync::Arc;

use tracing::{debug, info};

use crate::adapters::fs_temp::TempFileStore;
use crate::adapters::method_channel::MethodChannel;
use crate::adapters::probe_ffprobe::{FFprobeAdapter, FFPROBE_PROFILE};
use crate::adapters::toml_config::AppConfig;
use crate::app::metadata_interactor::{ExtractionSettings, MetadataInteractor};
use crate::domain::model::ProbeProfile;
use crate::error::{VidMetaError, VidMetaResult};
use crate::ports::{ProbePort, TempStorePort};

pub trait AppContainer: Send + Sync {
    fn metadata_interactor(&self) -> Arc<MetadataInteractor>;
    fn method_channel(&self) -> Arc<MethodChannel>;
}

pub struct DefaultAppContainer {
    metadata_interactor: Arc<MetadataInteractor>,
    method_channel: Arc<MethodChannel>,
}

impl DefaultAppContainer {
    /// Wire the prober named by `config.prober` with a temp store under `config.temp_dir`
    pub fn new(config: &AppConfig) -> VidMetaResult<Self> {
        let probe_port = build_prober(config)?;
        let temp_dir = config
            .temp_dir
            .clone()
            .unwrap_or_else(TempFileStore::default_dir);
        let temp_store: Arc<dyn TempStorePort> =
            Arc::new(TempFileStore::new(temp_dir, config.temp_prefix.clone())?);

        let settings = ExtractionSettings {
            probe_timeout: config.probe_timeout(),
            max_input_bytes: config.max_input_bytes,
        };

        Ok(Self::with_ports(probe_port, temp_store, settings))
    }

    /// Wire explicit ports, bypassing configuration
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        temp_store: Arc<dyn TempStorePort>,
        settings: ExtractionSettings,
    ) -> Self {
        let metadata_interactor = Arc::new(MetadataInteractor::new(probe_port, temp_store, settings));
        let method_channel = Arc::new(MethodChannel::new(Arc::clone(&metadata_interactor)));

        Self {
            metadata_interactor,
            method_channel,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn metadata_interactor(&self) -> Arc<MetadataInteractor> {
        Arc::clone(&self.metadata_interactor)
    }

    fn method_channel(&self) -> Arc<MethodChannel> {
        Arc::clone(&self.method_channel)
    }
}

/// Resolve `auto`, `libav` or `ffprobe` to a concrete prober.
///
/// `auto` prefers the in-process prober when it is compiled in.
pub fn build_prober(config: &AppConfig) -> VidMetaResult<Arc<dyn ProbePort>> {
    let prober: Arc<dyn ProbePort> = match config.prober.as_str() {
        "auto" if cfg!(feature = "libav") => libav_prober()?,
        "auto" | "ffprobe" => Arc::new(FFprobeAdapter::new(config.ffprobe_path.clone())),
        "libav" => libav_prober()?,
        other => {
            return Err(VidMetaError::config(format!("Unknown prober '{}'", other)));
        }
    };

    info!(prober = prober.profile().name, "Prober selected");
    Ok(prober)
}

#[cfg(feature = "libav")]
fn libav_prober() -> VidMetaResult<Arc<dyn ProbePort>> {
    use crate::adapters::probe_libav::{ensure_initialized, ProbeLibavAdapter};

    ensure_initialized().map_err(VidMetaError::from)?;
    debug!("libav prober initialized");
    Ok(Arc::new(ProbeLibavAdapter::new()))
}

#[cfg(not(feature = "libav"))]
fn libav_prober() -> VidMetaResult<Arc<dyn ProbePort>> {
    debug!("libav prober requested but not compiled in");
    Err(VidMetaError::from(crate::domain::errors::ExtractionError::media(
        "The libav prober is not compiled into this build",
    )))
}

/// Profiles of every prober compiled into this build
pub fn available_profiles() -> Vec<ProbeProfile> {
    let mut profiles = Vec::new();
    #[cfg(feature = "libav")]
    profiles.push(crate::adapters::probe_libav::LIBAV_PROFILE);
    profiles.push(FFPROBE_PROFILE);
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffprobe_prober_from_config() {
        let config = AppConfig {
            prober: "ffprobe".to_string(),
            ..AppConfig::default()
        };
        let prober = build_prober(&config).unwrap();
        assert_eq!(prober.profile(), FFPROBE_PROFILE);
    }

    #[test]
    fn test_unknown_prober_rejected() {
        let config = AppConfig {
            prober: "gstreamer".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(build_prober(&config), Err(VidMetaError::Config { .. })));
    }

    #[test]
    fn test_available_profiles_lists_ffprobe() {
        let profiles = available_profiles();
        assert!(profiles.contains(&FFPROBE_PROFILE));
        assert_eq!(profiles.len(), if cfg!(feature = "libav") { 2 } else { 1 });
    }

    #[test]
    fn test_container_uses_configured_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            prober: "ffprobe".to_string(),
            temp_dir: Some(dir.path().join("store")),
            probe_timeout_secs: 3,
            ..AppConfig::default()
        };

        let container = DefaultAppContainer::new(&config).unwrap();
        let interactor = container.metadata_interactor();
        assert!(dir.path().join("store").is_dir());
        assert_eq!(interactor.settings().probe_timeout.as_secs(), 3);
        assert_eq!(interactor.profile(), FFPROBE_PROFILE);
    }
}
