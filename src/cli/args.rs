//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use clap_num::number_range;

use crate::adapters::toml_config::MAX_PROBE_TIMEOUT_SECS;

fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    number_range(s, 1, MAX_PROBE_TIMEOUT_SECS)
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    number_range(s, 1, 1024)
}

/// Rendering of the `inspect` result
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Extension hint (default: the input file's extension)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Prober to use (auto, libav, ffprobe)
    #[arg(long)]
    pub prober: Option<String>,

    /// Probe timeout in seconds (1-3600)
    #[arg(long, value_parser = parse_timeout_secs)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Calls processed at once (1-1024)
    #[arg(long, value_parser = parse_concurrency)]
    pub max_concurrent: Option<usize>,

    /// Prober to use (auto, libav, ffprobe)
    #[arg(long)]
    pub prober: Option<String>,
}
