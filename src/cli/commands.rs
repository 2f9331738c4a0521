//! Command implementations

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::{error, info};

use crate::adapters::toml_config::AppConfig;
use crate::app::container::{available_profiles, AppContainer, DefaultAppContainer};
use crate::cli::args::{InspectArgs, OutputFormat, ServeArgs};
use crate::domain::model::{MetadataRequest, VideoMetadataRecord};
use crate::utils::path::PathUtils;
use crate::utils::time::TimeFormatter;
use crate::utils::Utils;

/// Execute the inspect command
pub async fn inspect(config: &AppConfig, args: InspectArgs) -> Result<()> {
    info!("Starting inspect operation");
    info!("Input: {}", args.input.display());

    let extension = match args.extension.clone() {
        Some(extension) => extension,
        None => PathUtils::get_extension(&args.input).ok_or_else(|| {
            anyhow::anyhow!(
                "Cannot infer extension of {}; pass --extension",
                args.input.display()
            )
        })?,
    };

    let bytes = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;

    let container = DefaultAppContainer::new(config)?;
    let record = container
        .metadata_interactor()
        .extract_metadata(MetadataRequest::new(bytes, extension))
        .await
        .map_err(|e| {
            error!("Extraction failed: {}", e);
            anyhow::Error::new(e)
        })?;

    let rendered = match args.format {
        OutputFormat::Json if args.pretty => serde_json::to_string_pretty(&record)
            .context("Failed to serialize record to JSON")?,
        OutputFormat::Json => {
            serde_json::to_string(&record).context("Failed to serialize record to JSON")?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&record).context("Failed to serialize record to YAML")?
        }
        OutputFormat::Text => format_as_text(&PathUtils::display_name(&args.input), &record),
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered.trim_end())?;

    info!("Inspect operation completed successfully");
    Ok(())
}

/// Execute the serve command
pub async fn serve(config: &AppConfig, _args: ServeArgs) -> Result<()> {
    let container = DefaultAppContainer::new(config)?;
    let channel = container.method_channel();

    info!(
        prober = container.metadata_interactor().profile().name,
        max_concurrent = config.max_concurrent_requests,
        "Serving method calls on stdin"
    );

    let served = channel
        .serve(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            config.max_concurrent_requests,
        )
        .await
        .context("Method channel failed")?;

    info!("Served {} method calls", served);
    Ok(())
}

/// Execute the probers command
pub fn probers() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for profile in available_profiles() {
        writeln!(
            stdout,
            "{:<8} date={:?} bitrate={:?} extension_hint={}",
            profile.name, profile.date_source, profile.bitrate_policy, profile.uses_extension_hint
        )?;
    }
    Ok(())
}

/// Render a record in human-readable form
fn format_as_text(name: &str, record: &VideoMetadataRecord) -> String {
    let mut output = String::new();

    output.push_str("Video Metadata:\n");
    output.push_str(&format!("  File: {}\n", name));
    output.push_str(&format!("  File Size: {}\n", Utils::format_file_size(record.file_size)));
    output.push_str(&format!("  Duration: {}\n", TimeFormatter::format_millis(record.duration)));
    output.push_str(&format!("  Dimensions: {}x{}\n", record.width, record.height));
    output.push_str(&format!("  Rotation: {}°\n", record.rotation));
    output.push_str(&format!("  Bit Rate: {}\n", Utils::format_bitrate(record.bitrate)));

    let tags = [
        ("Title", &record.title),
        ("Artist", &record.artist),
        ("Author", &record.author),
        ("Album", &record.album),
        ("Album Artist", &record.album_artist),
        ("Date", &record.date),
    ];
    for (label, value) in tags.iter().filter(|(_, value)| !value.is_empty()) {
        output.push_str(&format!("  {}: {}\n", label, value));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_as_text_skips_empty_tags() {
        let record = VideoMetadataRecord {
            file_size: 2048,
            duration: 1500.0,
            width: 640,
            height: 360,
            rotation: 90,
            bitrate: 10_922,
            title: "Holiday".to_string(),
            ..VideoMetadataRecord::default()
        };

        let text = format_as_text("clip.mp4", &record);
        assert!(text.contains("File: clip.mp4"));
        assert!(text.contains("Dimensions: 640x360"));
        assert!(text.contains("Duration: 00:01.500"));
        assert!(text.contains("Title: Holiday"));
        assert!(!text.contains("Artist"));
    }
}
