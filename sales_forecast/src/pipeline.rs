//! End-to-end analysis runs
//!
//! The quantity stage turns the raw export into the pivoted quantity table;
//! the visualization stage reads that table back, forecasts every item and
//! regenerates the grid plots and the forecast summary.

use crate::cleaning::{basic_stats, BasicStats, Cleaner, CleaningReport};
use crate::config::AnalysisConfig;
use crate::data::TransactionLoader;
use crate::error::Result;
use crate::forecast::forecast_item;
use crate::pivot::QuantityTable;
use crate::plots::{GridPlotRenderer, PlotNames};
use crate::series::weekday_slots;
use crate::summary::ForecastSummary;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which stages an analysis run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    #[default]
    Full,
    QuantityOnly,
    VisualizationOnly,
}

/// Outcome of the quantity stage
#[derive(Debug, Clone)]
pub struct QuantityOutcome {
    pub table: QuantityTable,
    pub report: CleaningReport,
    pub stats: BasicStats,
    pub skipped_rows: usize,
    pub pivot_path: PathBuf,
}

/// Outcome of the visualization stage
#[derive(Debug, Clone)]
pub struct VisualizationOutcome {
    pub plots: Vec<PathBuf>,
    pub summary: ForecastSummary,
    pub summary_path: PathBuf,
}

/// Load, clean and pivot the raw export, then write the quantity table
pub fn run_quantity_analysis(config: &AnalysisConfig) -> Result<QuantityOutcome> {
    let paths = &config.paths;
    info!(input = %paths.input.display(), "Loading transactions");

    let loaded = TransactionLoader::from_csv(&paths.input, &config.columns)?;
    let cleaned = Cleaner::new(&config.cleaning).clean(&loaded.records);
    let stats = basic_stats(&loaded.records, &cleaned.records);

    info!(
        total_quantity = stats.total_quantity,
        unique_items = stats.unique_items,
        unique_categories = stats.unique_categories,
        "Basic statistics"
    );
    if let Some((first, last)) = stats.date_range {
        info!(%first, %last, "Date range");
    }

    let table = QuantityTable::from_records(&cleaned.records, config.cleaning.closed_weekday);
    let (items, dates) = table.shape();
    info!(items, dates, "Pivoted quantity table");

    fs::create_dir_all(&paths.data_dir)?;
    let pivot_path = paths.pivot_path();
    table.write_csv(&pivot_path)?;
    info!(path = %pivot_path.display(), "Saved quantity table");

    Ok(QuantityOutcome {
        table,
        report: cleaned.report,
        stats,
        skipped_rows: loaded.skipped_rows,
        pivot_path,
    })
}

/// Forecast every item of the saved quantity table and regenerate the plots
pub fn run_visualization(config: &AnalysisConfig) -> Result<VisualizationOutcome> {
    let pivot_path = config.paths.pivot_path();
    info!(path = %pivot_path.display(), "Loading quantity table");

    let table = QuantityTable::read_csv(
        &pivot_path,
        config.columns.legacy_header_year,
        config.cleaning.closed_weekday,
    )?;
    render_reports(&table, config)
}

/// Forecast and plot an in-memory quantity table
pub fn render_reports(table: &QuantityTable, config: &AnalysisConfig) -> Result<VisualizationOutcome> {
    let plot_dir = config.paths.plot_dir();
    fs::create_dir_all(&plot_dir)?;
    let removed = remove_stale_plots(&plot_dir)?;
    debug!(removed, "Removed stale plots");

    let weekdays = weekday_slots(config.cleaning.closed_weekday);
    let renderer = GridPlotRenderer::default();
    let mut summary = ForecastSummary::new(config.forecast.interval_width);
    let mut plots = Vec::with_capacity(table.items().len());
    let mut names = PlotNames::new();

    for item in table.items() {
        let forecast = forecast_item(table, item, &weekdays, &config.forecast)?;
        let file_name = names.assign(item);
        let path = plot_dir.join(&file_name);
        renderer.render(&forecast, &path)?;

        info!(
            item = %item,
            forecasts = forecast.available_count(),
            slots = weekdays.len(),
            "Generated grid plot"
        );
        summary.push(&forecast, file_name);
        plots.push(path);
    }

    let summary_path = config.paths.summary_path();
    summary.write_json(&summary_path)?;
    info!(plots = plots.len(), dir = %plot_dir.display(), "Visualization complete");

    Ok(VisualizationOutcome {
        plots,
        summary,
        summary_path,
    })
}

/// Run the stages selected by `mode`
pub fn run(config: &AnalysisConfig, mode: AnalysisMode) -> Result<()> {
    match mode {
        AnalysisMode::Full => {
            let quantity = run_quantity_analysis(config)?;
            render_reports(&quantity.table, config)?;
        }
        AnalysisMode::QuantityOnly => {
            run_quantity_analysis(config)?;
        }
        AnalysisMode::VisualizationOnly => {
            run_visualization(config)?;
        }
    }
    Ok(())
}

/// Delete existing PNG files so the directory mirrors the current item set
fn remove_stale_plots(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "png") {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
