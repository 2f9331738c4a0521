//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::toml_config::AppConfig;
use crate::cli::{Cli, Commands};

/// Build the effective configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppConfig> {
    // Steps 1-3: defaults, then file, then VIDMETA_* environment
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Step 4: CLI arguments
    apply_cli_configuration_overrides(&mut config, cli);

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(config: &mut AppConfig, cli: &Cli) {
    let mut cli_overrides = 0;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
        cli_overrides += 1;
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
        cli_overrides += 1;
    }

    match &cli.command {
        Commands::Inspect(args) => {
            if let Some(prober) = &args.prober {
                config.prober = prober.clone();
                cli_overrides += 1;
            }
            if let Some(timeout) = args.timeout {
                config.probe_timeout_secs = timeout;
                cli_overrides += 1;
            }
        }
        Commands::Serve(args) => {
            if let Some(prober) = &args.prober {
                config.prober = prober.clone();
                cli_overrides += 1;
            }
            if let Some(max_concurrent) = args.max_concurrent {
                config.max_concurrent_requests = max_concurrent;
                cli_overrides += 1;
            }
        }
        Commands::Probers => {}
    }

    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }
}
