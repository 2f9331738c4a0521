// TOML config adapter - Typed configuration loaded from TOML files and environment

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::fs_temp::DEFAULT_TEMP_PREFIX;
use crate::adapters::tracing_log::{LogFormat, LogLevel};
use crate::error::{VidMetaError, VidMetaResult};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "vidmeta.toml";

/// Probers accepted by the `prober` key
pub const PROBER_NAMES: &[&str] = &["auto", "libav", "ffprobe"];

/// Upper bound on `probe_timeout_secs`, matching the CLI's `--timeout` range
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 3600;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "VIDMETA_";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// `auto`, `libav` or `ffprobe`
    pub prober: String,
    pub probe_timeout_secs: u64,
    /// Directory for transient files; `None` uses `<os temp>/vidmeta`
    pub temp_dir: Option<PathBuf>,
    pub temp_prefix: String,
    pub max_input_bytes: u64,
    pub ffprobe_path: PathBuf,
    pub max_concurrent_requests: usize,
    pub log_level: String,
    pub log_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prober: "auto".to_string(),
            probe_timeout_secs: 5,
            temp_dir: None,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            max_input_bytes: 2 * 1024 * 1024 * 1024,
            ffprobe_path: PathBuf::from("ffprobe"),
            max_concurrent_requests: num_cpus::get(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    vidmeta: AppConfig,
}

impl AppConfig {
    /// Bound applied to each probe
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Parse the `[vidmeta]` table of a TOML document
    pub fn from_toml_str(content: &str) -> VidMetaResult<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.vidmeta)
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> VidMetaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| VidMetaError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        info!("Loaded configuration from: {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Defaults, overlaid by `explicit` (or `vidmeta.toml` if present), then
    /// by `VIDMETA_*` environment variables
    pub fn load(explicit: Option<&Path>) -> VidMetaResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `VIDMETA_<KEY>` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> VidMetaResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key));
        let mut overrides = 0;

        if let Some(value) = var("PROBER") {
            self.prober = value;
            overrides += 1;
        }
        if let Some(value) = var("PROBE_TIMEOUT_SECS") {
            self.probe_timeout_secs = parse_number("PROBE_TIMEOUT_SECS", &value)?;
            overrides += 1;
        }
        if let Some(value) = var("TEMP_DIR") {
            self.temp_dir = Some(PathBuf::from(value));
            overrides += 1;
        }
        if let Some(value) = var("TEMP_PREFIX") {
            self.temp_prefix = value;
            overrides += 1;
        }
        if let Some(value) = var("MAX_INPUT_BYTES") {
            self.max_input_bytes = parse_number("MAX_INPUT_BYTES", &value)?;
            overrides += 1;
        }
        if let Some(value) = var("FFPROBE_PATH") {
            self.ffprobe_path = PathBuf::from(value);
            overrides += 1;
        }
        if let Some(value) = var("MAX_CONCURRENT_REQUESTS") {
            self.max_concurrent_requests = parse_number("MAX_CONCURRENT_REQUESTS", &value)?;
            overrides += 1;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log_level = value;
            overrides += 1;
        }
        if let Some(value) = var("LOG_FORMAT") {
            self.log_format = value;
            overrides += 1;
        }

        if overrides > 0 {
            info!("Applied {} environment variable overrides", overrides);
        }
        Ok(())
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> VidMetaResult<()> {
        if !PROBER_NAMES.contains(&self.prober.as_str()) {
            return Err(VidMetaError::config(format!(
                "Unknown prober '{}'. Valid probers: {}",
                self.prober,
                PROBER_NAMES.join(", ")
            )));
        }
        if !(1..=MAX_PROBE_TIMEOUT_SECS).contains(&self.probe_timeout_secs) {
            return Err(VidMetaError::config(format!(
                "probe_timeout_secs must be between 1 and {}",
                MAX_PROBE_TIMEOUT_SECS
            )));
        }
        if self.max_concurrent_requests == 0 {
            return Err(VidMetaError::config("max_concurrent_requests must be at least 1"));
        }
        if self.max_input_bytes == 0 {
            return Err(VidMetaError::config("max_input_bytes must be at least 1"));
        }
        if self.temp_prefix.contains(['/', '\\']) {
            return Err(VidMetaError::config("temp_prefix must not contain path separators"));
        }
        LogLevel::parse(&self.log_level)?;
        LogFormat::parse(&self.log_format)?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> VidMetaResult<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        VidMetaError::config(format!("Invalid value for {}{}: {}", ENV_PREFIX, key, e))
    })
}
