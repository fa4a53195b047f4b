//! Plot catalog
//!
//! The plot directory is the single source of truth for which items the
//! dashboard shows. Item names and slugs are derived from plot file names.
//! Statistics come from the forecast summary, or are recomputed from the
//! quantity table when the summary has nothing for a plot.

use sales_forecast::config::{AnalysisConfig, PLOT_DIR_NAME, SUMMARY_FILE_NAME};
use sales_forecast::forecast::forecast_item;
use sales_forecast::plots::{PlotNames, PLOT_SUFFIX};
use sales_forecast::series::weekday_slots;
use sales_forecast::summary::{ForecastSummary, ItemSummary};
use sales_forecast::QuantityTable;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// One plot file as listed by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotEntry {
    pub filename: String,
    pub item_name: String,
    pub slug: String,
}

impl PlotEntry {
    /// Entry for a plot file name, `None` unless it is a plain PNG name
    pub fn from_filename(filename: &str) -> Option<Self> {
        if !is_plain_png_name(filename) {
            return None;
        }

        let stem = filename
            .strip_suffix(PLOT_SUFFIX)
            .or_else(|| filename.strip_suffix(".png"))?;
        let item_name = stem.replace('_', " ");
        let slug = slugify(&item_name);

        Some(Self {
            filename: filename.to_string(),
            item_name,
            slug,
        })
    }
}

/// URL slug of an item name: lowercase, spaces as `_`
pub fn slugify(item_name: &str) -> String {
    item_name.trim().to_lowercase().replace(' ', "_")
}

/// A bare `*.png` file name with no path components
pub fn is_plain_png_name(filename: &str) -> bool {
    !filename.is_empty()
        && filename.ends_with(".png")
        && filename.len() > ".png".len()
        && !filename.contains(['/', '\\'])
        && !filename.contains("..")
}

/// Read-only view over a reports directory
#[derive(Debug, Clone)]
pub struct PlotCatalog {
    plot_dir: PathBuf,
    summary_path: PathBuf,
    analysis: Option<Arc<AnalysisConfig>>,
}

impl PlotCatalog {
    pub fn new(reports_dir: &Path) -> Self {
        Self {
            plot_dir: reports_dir.join(PLOT_DIR_NAME),
            summary_path: reports_dir.join(SUMMARY_FILE_NAME),
            analysis: None,
        }
    }

    /// Recompute missing statistics with this analysis configuration
    pub fn with_analysis(mut self, config: Arc<AnalysisConfig>) -> Self {
        self.analysis = Some(config);
        self
    }

    /// Interval width used when statistics are recomputed
    pub fn fallback_interval_width(&self) -> Option<f64> {
        self.analysis.as_ref().map(|c| c.forecast.interval_width)
    }

    pub fn plot_dir(&self) -> &Path {
        &self.plot_dir
    }

    /// Every plot, sorted by item name. A missing directory lists nothing.
    pub fn list(&self) -> io::Result<Vec<PlotEntry>> {
        let entries = match fs::read_dir(&self.plot_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut plots = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(plot) = entry.file_name().to_str().and_then(PlotEntry::from_filename) {
                plots.push(plot);
            }
        }

        plots.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(plots)
    }

    /// Plots whose item name contains `query`, ignoring case
    pub fn search(&self, query: &str) -> io::Result<Vec<PlotEntry>> {
        let needle = query.trim().to_lowercase();
        let mut plots = self.list()?;
        if !needle.is_empty() {
            plots.retain(|p| p.item_name.to_lowercase().contains(&needle));
        }
        Ok(plots)
    }

    /// Plot whose slug matches `slug` once it is normalised the same way
    pub fn find_by_slug(&self, slug: &str) -> io::Result<Option<PlotEntry>> {
        let slug = slugify(slug);
        Ok(self.list()?.into_iter().find(|p| p.slug == slug))
    }

    /// Path of an existing plot file, `None` for unsafe or unknown names
    pub fn plot_path(&self, filename: &str) -> Option<PathBuf> {
        if !is_plain_png_name(filename) {
            return None;
        }
        let path = self.plot_dir.join(filename);
        path.is_file().then_some(path)
    }

    /// The forecast summary of the last run, if one was written
    pub fn summary(&self) -> Option<ForecastSummary> {
        if !self.summary_path.exists() {
            return None;
        }
        match ForecastSummary::read_json(&self.summary_path) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Ignoring unreadable forecast summary: {}", e);
                None
            }
        }
    }

    /// Statistics for a plot recomputed from the quantity table.
    ///
    /// Items are named in table order, so a plot that got a collision suffix
    /// maps back to the same item the analysis run rendered it for.
    pub fn recompute(&self, plot: &PlotEntry) -> Option<ItemSummary> {
        let config = self.analysis.as_ref()?;
        let pivot_path = config.paths.pivot_path();
        if !pivot_path.exists() {
            debug!("No quantity table at {}", pivot_path.display());
            return None;
        }

        let table = match QuantityTable::read_csv(
            &pivot_path,
            config.columns.legacy_header_year,
            config.cleaning.closed_weekday,
        ) {
            Ok(table) => table,
            Err(e) => {
                warn!("Ignoring unreadable quantity table {}: {}", pivot_path.display(), e);
                return None;
            }
        };

        let mut names = PlotNames::new();
        let item = table
            .items()
            .iter()
            .find(|item| names.assign(item.as_str()) == plot.filename)?;

        let weekdays = weekday_slots(config.cleaning.closed_weekday);
        match forecast_item(&table, item, &weekdays, &config.forecast) {
            Ok(forecast) => {
                let mut summary = ItemSummary::from(&forecast);
                summary.plot_file = plot.filename.clone();
                Some(summary)
            }
            Err(e) => {
                warn!(item = %item, "Failed to recompute statistics: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_plot_file() {
        let entry = PlotEntry::from_filename("Dubai_Chocolate_Croissant_grid_plot.png").unwrap();
        assert_eq!(entry.item_name, "Dubai Chocolate Croissant");
        assert_eq!(entry.slug, "dubai_chocolate_croissant");

        let bare = PlotEntry::from_filename("Baguette.png").unwrap();
        assert_eq!(bare.item_name, "Baguette");
    }

    #[test]
    fn test_rejects_non_plot_names() {
        for name in ["notes.txt", ".png", "../secret.png", "a/b.png", "..png", "a\\b.png", ""] {
            assert!(PlotEntry::from_filename(name).is_none(), "{name}");
        }
    }

    #[test]
    fn test_missing_plot_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = PlotCatalog::new(&dir.path().join("nowhere"));
        assert!(catalog.list().unwrap().is_empty());
        assert!(catalog.summary().is_none());
    }

    #[test]
    fn test_slug_lookup_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = PlotCatalog::new(dir.path());
        fs::create_dir_all(catalog.plot_dir()).unwrap();
        fs::write(catalog.plot_dir().join("Plain_Croissant_grid_plot.png"), b"png").unwrap();

        for slug in ["plain_croissant", "Plain_Croissant", "PLAIN_CROISSANT"] {
            let entry = catalog.find_by_slug(slug).unwrap().unwrap();
            assert_eq!(entry.filename, "Plain_Croissant_grid_plot.png", "{slug}");
        }
        assert!(catalog.find_by_slug("plain").unwrap().is_none());
    }

    #[test]
    fn test_recompute_needs_an_analysis_config() {
        let dir = tempfile::tempdir().unwrap();
        let plot = PlotEntry::from_filename("Plain_Croissant_grid_plot.png").unwrap();

        assert!(PlotCatalog::new(dir.path()).recompute(&plot).is_none());

        let mut config = AnalysisConfig::default();
        config.paths.data_dir = dir.path().join("data");
        let catalog = PlotCatalog::new(dir.path()).with_analysis(Arc::new(config));
        assert!(catalog.recompute(&plot).is_none());
        assert_eq!(catalog.fallback_interval_width(), Some(0.8));
    }
}
