//! run_analysis - Quantity pivot and weekday forecast plots
//!
//! Runs the quantity stage, the visualization stage, or both.

use anyhow::{Context, Result};
use clap::Parser;
use sales_forecast::pipeline::{self, AnalysisMode};
use sales_forecast::AnalysisConfig;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "run_analysis", version, about = "Sales quantity analysis and forecast plots")]
struct Args {
    /// Only build the quantity table
    #[arg(long, conflicts_with = "viz_only")]
    quantity_only: bool,

    /// Only render plots from an existing quantity table
    #[arg(long)]
    viz_only: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Raw transaction export
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory for the quantity table
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for plots and the forecast summary
    #[arg(long)]
    reports_dir: Option<PathBuf>,
}

impl Args {
    fn mode(&self) -> AnalysisMode {
        if self.quantity_only {
            AnalysisMode::QuantityOnly
        } else if self.viz_only {
            AnalysisMode::VisualizationOnly
        } else {
            AnalysisMode::Full
        }
    }

    fn load_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(input) = &self.input {
            config.paths.input = input.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.paths.data_dir = dir.clone();
        }
        if let Some(dir) = &self.reports_dir {
            config.paths.reports_dir = dir.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mode = args.mode();
    let config = args.load_config()?;

    info!(
        "Starting {} v{} ({:?})",
        sales_forecast::NAME,
        sales_forecast::VERSION,
        mode
    );

    if let Err(e) = pipeline::run(&config, mode) {
        error!("Analysis failed: {}", e);
        return Err(e.into());
    }

    info!("Analysis complete");
    Ok(())
}
