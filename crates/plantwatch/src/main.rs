// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plantwatch - operator console for plant telemetry.
//!
//! This is the binary entry point for the Plantwatch console.

mod commands;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use plantwatch_config::PlantwatchConfig;
use plantwatch_core::{DeviceId, MetricKind, PlantwatchError};
use plantwatch_telemetry::TelemetryService;

/// Plantwatch - operator console for plant telemetry.
#[derive(Parser, Debug)]
#[command(name = "plantwatch", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the devices known to the backend.
    Devices,
    /// Print the most recent entry of a device.
    Latest { device: String },
    /// Print historical samples of a device.
    History {
        device: String,
        /// Keep only the first N samples (defaults to the dashboard limit).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the realtime window of a device.
    Realtime { device: String },
    /// Read or change alert thresholds.
    Threshold {
        #[command(subcommand)]
        action: ThresholdAction,
    },
    /// Poll a device and log the dashboard until interrupted.
    Watch { device: String },
}

#[derive(Subcommand, Debug)]
enum ThresholdAction {
    /// Print the threshold of one metric.
    Get { device: String, metric: MetricKind },
    /// Set the threshold of one metric.
    Set {
        device: String,
        metric: MetricKind,
        value: f64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => plantwatch_config::load_and_validate_path(path),
        None => plantwatch_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            plantwatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("plantwatch: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: PlantwatchConfig) -> Result<(), PlantwatchError> {
    let service = TelemetryService::from_config(&config)?;
    tracing::debug!(base_url = %service.client().base_url(), "telemetry service ready");

    match command {
        Commands::Devices => println!("{}", commands::devices(&service).await?),
        Commands::Latest { device } => println!("{}", commands::latest(&service, &device).await?),
        Commands::History { device, limit } => {
            let limit = limit.unwrap_or(config.polling.history_display_limit);
            println!("{}", commands::history(&service, &device, limit).await?);
        }
        Commands::Realtime { device } => {
            println!("{}", commands::realtime(&service, &device).await?)
        }
        Commands::Threshold { action } => match action {
            ThresholdAction::Get { device, metric } => {
                println!("{}", commands::threshold_get(&service, &device, metric).await?)
            }
            ThresholdAction::Set {
                device,
                metric,
                value,
            } => commands::threshold_set(&service, &device, metric, value).await?,
        },
        Commands::Watch { device } => {
            let shutdown = watch::install_signal_handler();
            watch::run_watch(
                Arc::new(service),
                &config.polling,
                DeviceId::from(device),
                shutdown,
            )
            .await;
        }
    }
    Ok(())
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plantwatch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config = plantwatch_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn parses_threshold_set() {
        let cli = Cli::try_parse_from([
            "plantwatch",
            "threshold",
            "set",
            "dev-1",
            "oilLevel",
            "20.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Threshold {
                action:
                    ThresholdAction::Set {
                        device,
                        metric,
                        value,
                    },
            } => {
                assert_eq!(device, "dev-1");
                assert_eq!(metric, MetricKind::OilLevel);
                assert_eq!(value, 20.5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_metric() {
        let result = Cli::try_parse_from(["plantwatch", "threshold", "get", "dev-1", "pressure"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["plantwatch", "latest", "dev-1", "--config", "/tmp/pw.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pw.toml")));
        assert!(matches!(cli.command, Commands::Latest { device } if device == "dev-1"));
    }

    #[test]
    fn history_limit_is_optional() {
        let cli = Cli::try_parse_from(["plantwatch", "history", "dev-1"]).unwrap();
        assert!(matches!(cli.command, Commands::History { limit: None, .. }));
    }
}
