//! VidMeta CLI
//!
//! Extracts a flat metadata record (size, duration, dimensions, rotation,
//! bitrate, descriptive tags, date) from video files.
//!
//! # Usage
//!
//! ```bash
//! vidmeta inspect --input clip.mov --pretty
//! vidmeta inspect --input upload.bin --extension mp4 --prober ffprobe
//! vidmeta serve --max-concurrent 8 < calls.jsonl
//! vidmeta probers
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use vidmeta::adapters::tracing_log::{init_logging, LogFormat, LogLevel};
use vidmeta::cli::{commands, Cli, Commands};
use vidmeta::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the VidMeta CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;

    // Initialize logging
    init_logging(
        LogLevel::parse(&config.log_level)?,
        LogFormat::parse(&config.log_format)?,
    )?;

    info!("Starting VidMeta {}", env!("CARGO_PKG_VERSION"));

    // Execute the requested command
    match cli.command {
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(&config, args).await?;
        }
        Commands::Serve(args) => {
            info!("Executing serve command");
            commands::serve(&config, args).await?;
        }
        Commands::Probers => commands::probers()?,
    }

    Ok(())
}
