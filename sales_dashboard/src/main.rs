//! run_web - Forecast plot dashboard
//!
//! Serves the grid plots and forecast statistics of a reports directory.

use anyhow::{Context, Result};
use clap::Parser;
use sales_dashboard::{build_router, AppState};
use sales_forecast::config::AnalysisConfig;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "run_web", version, about = "Sales forecast dashboard")]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Listen on all interfaces (overrides --host)
    #[arg(long)]
    public: bool,

    /// Directory written by run_analysis
    #[arg(long, default_value = "reports")]
    reports_dir: PathBuf,

    /// TOML configuration used by run_analysis
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the quantity table, for statistics the summary lacks
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Args {
    fn load_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.paths.data_dir = dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = args.load_config()?;
    info!("Fallback quantity table: {}", config.paths.pivot_path().display());
    let state = AppState::new(&args.reports_dir).with_analysis(config);
    let catalog = state.catalog();
    let plots = catalog
        .list()
        .with_context(|| format!("Failed to read {}", catalog.plot_dir().display()))?;
    if plots.is_empty() {
        warn!(
            "No plots found in {}. Run run_analysis first.",
            catalog.plot_dir().display()
        );
    } else {
        info!("Serving {} plots from {}", plots.len(), catalog.plot_dir().display());
    }

    let host = if args.public { "0.0.0.0" } else { args.host.as_str() };
    let addr = format!("{}:{}", host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Dashboard listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
