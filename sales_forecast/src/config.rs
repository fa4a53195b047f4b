//! Analysis configuration
//!
//! Every knob of the pipeline lives here. `AnalysisConfig::default()` encodes
//! the bakery's own setup; a TOML file may override any subset of it.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use sales_math::{TrimPolicy, DEFAULT_ZERO_RUN_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name of the pivoted quantity table inside the data directory
pub const PIVOT_FILE_NAME: &str = "quantity_per_day_per_item.csv";
/// Sub directory of the reports directory holding the grid plots
pub const PLOT_DIR_NAME: &str = "grid_plots";
/// File name of the per-item statistics written next to the plots
pub const SUMMARY_FILE_NAME: &str = "forecast_summary.json";

/// Top level configuration for an analysis run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub paths: PathsConfig,
    pub columns: ColumnConfig,
    pub cleaning: CleaningConfig,
    pub forecast: ForecastConfig,
}

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw transaction export
    pub input: PathBuf,
    /// Directory receiving the pivoted quantity table
    pub data_dir: PathBuf,
    /// Directory receiving plots and the forecast summary
    pub reports_dir: PathBuf,
}

/// Column names of the raw export and pivot header handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub date: String,
    pub item: String,
    pub category: String,
    pub quantity: String,
    pub net_sales: String,
    /// Year assumed for pivot headers written without one (`M/D - Weekday`)
    pub legacy_header_year: i32,
}

/// Row filters and item name consolidation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Categories kept for forecasting
    pub categories: Vec<String>,
    /// Weekday the shop is closed; rows on it are dropped
    pub closed_weekday: Option<Weekday>,
    /// Calendar days (any year) dropped from the history
    pub excluded_days: Vec<ExcludedDay>,
    /// Canonical item name -> name variants merged into it
    pub rename: BTreeMap<String, Vec<String>>,
    /// Case-insensitive substrings marking one-off seasonal items
    pub exclude_patterns: Vec<String>,
}

/// Forecast model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Consecutive zeros marking the pre-introduction period
    pub zero_run_threshold: usize,
    pub trim_policy: TrimPolicy,
    /// Minimum raw observations in a weekday series before forecasting
    pub min_observations: usize,
    /// Minimum observations left after trimming the pre-introduction period
    pub min_fit_observations: usize,
    /// Number of weekly steps forecast per weekday slot
    pub horizon: usize,
    /// Coverage of the prediction interval
    pub interval_width: f64,
    /// Period of the Fourier seasonality terms in days
    pub seasonality_period_days: f64,
    /// Number of Fourier pairs; 0 disables seasonality
    pub seasonality_order: usize,
}

/// A calendar day excluded regardless of year, written `M/D`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExcludedDay {
    pub month: u32,
    pub day: u32,
}

impl ExcludedDay {
    /// Whether `date` falls on this day
    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

impl FromStr for ExcludedDay {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ForecastError::ConfigError(format!("Invalid excluded day '{}', expected M/D", s));
        let (month, day) = s.trim().split_once('/').ok_or_else(invalid)?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let day: u32 = day.trim().parse().map_err(|_| invalid())?;

        // 2024 is a leap year, so 2/29 is accepted
        if NaiveDate::from_ymd_opt(2024, month, day).is_none() {
            return Err(invalid());
        }

        Ok(Self { month, day })
    }
}

impl TryFrom<String> for ExcludedDay {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ExcludedDay> for String {
    fn from(value: ExcludedDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ExcludedDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.day)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/transaction-summary.csv"),
            data_dir: PathBuf::from("data"),
            reports_dir: PathBuf::from("reports"),
        }
    }
}

impl PathsConfig {
    /// Location of the pivoted quantity table
    pub fn pivot_path(&self) -> PathBuf {
        self.data_dir.join(PIVOT_FILE_NAME)
    }

    /// Directory holding the grid plots
    pub fn plot_dir(&self) -> PathBuf {
        self.reports_dir.join(PLOT_DIR_NAME)
    }

    /// Location of the forecast summary
    pub fn summary_path(&self) -> PathBuf {
        self.reports_dir.join(SUMMARY_FILE_NAME)
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            item: "Item".to_string(),
            category: "Category".to_string(),
            quantity: "Qty".to_string(),
            net_sales: "Net Sales".to_string(),
            legacy_header_year: 2024,
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        let rename: &[(&str, &[&str])] = &[
            // Exact duplicates and trailing spaces
            ("Berry Tart", &["Berry Tart "]),
            ("Chocolate Tart", &["Chocolate Tart "]),
            ("Crispy Egg Tart", &["Egg Tart"]),
            // Spelling and character variations
            (
                "Dubai Chocolate Croissant",
                &["Dubaï Chocolate Croissant", "Dubai Chocolate Croissant (Fri/Sat/Sun)"],
            ),
            (
                "Mini Black Sesame Croissant",
                &["Mini Black SésameCroissant", "Mini Black Sesame Croissant (Fri/Sat/Sun)"],
            ),
            ("Croque Monsieur", &["CroqueMonsieur"]),
            // Weekend-only naming
            (
                "Avocado Egg Croissant Sandwich",
                &[
                    "Avocado Egg Croissant Sandwich (Fri/Sat/Sun)",
                    "Avocado Egg Croissant Sandwich - Weekend Only",
                ],
            ),
            (
                "Black Sesame Croissant",
                &[
                    "Black Sesame Croissant (Fri/Sat/Sun)",
                    "Black Sesame Croissant Toast - Weekend Only",
                ],
            ),
            (
                "Brie Prosciutto Croissant Sandwich",
                &[
                    "Brie Prosciutto Croissant Sandwich (Fri/Sat/Sun)",
                    "Brie Prosciutto Croissant Sandwich - Weekend Only",
                ],
            ),
            (
                "Red Bow Tie Croissant",
                &[
                    "Red Bow Tie Croissant (Fri/Sat/Sun)",
                    "Red Bow Tie Croissant - Weekend Only",
                ],
            ),
            // Size and format variations
            ("Lemon Tart (Large)", &["Lemon Tart (L)"]),
            ("Raspberry Tart (Small)", &["Raspberry Tart(S)"]),
        ];

        Self {
            categories: ["Croissant", "Bread", "Pastries", "Drink"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            closed_weekday: Some(Weekday::Mon),
            excluded_days: vec![ExcludedDay { month: 1, day: 14 }],
            rename: rename
                .iter()
                .map(|(target, variants)| {
                    (
                        target.to_string(),
                        variants.iter().map(|v| v.to_string()).collect(),
                    )
                })
                .collect(),
            exclude_patterns: vec!["4th of July".to_string(), "Easter Special".to_string()],
        }
    }
}

impl CleaningConfig {
    /// Variant -> canonical name lookup built from the rename map
    pub fn rename_lookup(&self) -> HashMap<String, String> {
        let mut lookup = HashMap::new();
        for (target, variants) in &self.rename {
            for variant in variants {
                lookup.insert(variant.clone(), target.clone());
            }
        }
        lookup
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            zero_run_threshold: DEFAULT_ZERO_RUN_THRESHOLD,
            trim_policy: TrimPolicy::FirstRun,
            min_observations: 10,
            min_fit_observations: 5,
            horizon: 1,
            interval_width: 0.8,
            seasonality_period_days: 365.25,
            seasonality_order: 0,
        }
    }
}

impl AnalysisConfig {
    /// Load a TOML file; keys it omits keep their default values
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let forecast = &self.forecast;

        if self.cleaning.categories.is_empty() {
            return Err(ForecastError::ValidationError(
                "At least one category must be allowed".to_string(),
            ));
        }
        if forecast.zero_run_threshold == 0 {
            return Err(ForecastError::InvalidParameter(
                "zero_run_threshold must be at least 1".to_string(),
            ));
        }
        if forecast.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        if !(forecast.interval_width > 0.0 && forecast.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "interval_width must be between 0 and 1".to_string(),
            ));
        }
        if forecast.seasonality_order > 0 && forecast.seasonality_period_days <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "seasonality_period_days must be positive".to_string(),
            ));
        }

        // Intercept, trend and two terms per Fourier pair, plus one residual degree of freedom
        let regressors = 2 + 2 * forecast.seasonality_order;
        if forecast.min_fit_observations <= regressors {
            return Err(ForecastError::InvalidParameter(format!(
                "min_fit_observations must exceed the {} model regressors",
                regressors
            )));
        }
        if forecast.min_observations < forecast.min_fit_observations {
            return Err(ForecastError::InvalidParameter(
                "min_observations must not be below min_fit_observations".to_string(),
            ));
        }

        Ok(())
    }
}
