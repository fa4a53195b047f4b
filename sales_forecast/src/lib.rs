//! # Sales Forecast
//!
//! Point-of-sale quantity analysis for a small bakery.
//!
//! ## Features
//!
//! - Lenient loading of transaction exports
//! - Cleaning: category allow-list, closed weekday and excluded days, item
//!   name consolidation, removal of one-off seasonal items
//! - Pivoted items x days quantity table, saved as CSV
//! - Per-weekday forecasts with prediction intervals, trimmed of each
//!   item's pre-introduction period
//! - Grid plot PNGs and a JSON forecast summary per run
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::pipeline::{self, AnalysisMode};
//! use sales_forecast::AnalysisConfig;
//!
//! let mut config = AnalysisConfig::default();
//! config.paths.input = "exports/transactions.csv".into();
//!
//! pipeline::run(&config, AnalysisMode::Full)?;
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod cleaning;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod models;
pub mod pipeline;
pub mod pivot;
pub mod plots;
pub mod series;
pub mod summary;

// Re-export commonly used types
pub use crate::cleaning::{Cleaner, CleaningReport};
pub use crate::config::AnalysisConfig;
pub use crate::data::{TransactionLoader, TransactionRecord};
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{forecast_item, ItemForecast, WeekdayForecast};
pub use crate::models::{ForecastModel, ForecastResult};
pub use crate::pivot::QuantityTable;
pub use crate::summary::ForecastSummary;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
