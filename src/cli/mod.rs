//! CLI module for VidMeta
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{InspectArgs, OutputFormat, ServeArgs};

/// VidMeta video metadata extractor
///
/// Reads a video into memory, probes it with a native multimedia prober and
/// reports a flat metadata record.
#[derive(Parser, Debug)]
#[command(name = "vidmeta")]
#[command(about = "VidMeta - Video metadata extraction from in-memory bytes")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (text, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Configuration file (default: ./vidmeta.toml when present)
    #[arg(long, global = true, env = "VIDMETA_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the metadata record of a video file
    Inspect(args::InspectArgs),
    /// Serve JSON-lines method calls over stdin/stdout
    Serve(args::ServeArgs),
    /// List the probers compiled into this build
    Probers,
}
