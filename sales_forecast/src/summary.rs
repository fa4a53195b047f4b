//! Machine-readable forecast summary
//!
//! Written next to the plots so the dashboard can show the same statistics
//! that are drawn on each panel.

use crate::error::Result;
use crate::forecast::{ItemForecast, WeekdayForecast};
use crate::plots::plot_file_name;
use crate::series::weekday_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Summary of one weekday panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySummary {
    pub weekday: String,
    pub observations: usize,
    /// Leading observations dropped as pre-introduction
    pub trimmed: usize,
    pub average: f64,
    pub maximum: f64,
    pub next: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub available: bool,
    /// Why no forecast was produced
    pub reason: Option<String>,
}

/// Summary of one item's grid plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item: String,
    pub plot_file: String,
    pub weekdays: Vec<WeekdaySummary>,
}

impl From<&ItemForecast> for ItemSummary {
    fn from(forecast: &ItemForecast) -> Self {
        let weekdays = forecast
            .weekdays
            .iter()
            .map(|outcome| {
                let stats = outcome.stats();
                let next = outcome.forecast.result().and_then(|r| r.next());
                let reason = match &outcome.forecast {
                    WeekdayForecast::Available(_) => None,
                    WeekdayForecast::Unavailable(reason) => Some(reason.to_string()),
                };

                WeekdaySummary {
                    weekday: weekday_name(outcome.series.weekday()).to_string(),
                    observations: outcome.series.len(),
                    trimmed: outcome.series.trim_index(),
                    average: stats.average,
                    maximum: stats.maximum,
                    next: stats.next,
                    lower: next.map(|p| p.lower),
                    upper: next.map(|p| p.upper),
                    available: outcome.forecast.is_available(),
                    reason,
                }
            })
            .collect();

        Self {
            item: forecast.item.clone(),
            plot_file: plot_file_name(&forecast.item),
            weekdays,
        }
    }
}

/// Summary of a whole visualization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub generated_at: DateTime<Utc>,
    pub interval_width: f64,
    pub items: Vec<ItemSummary>,
}

impl ForecastSummary {
    pub fn new(interval_width: f64) -> Self {
        Self {
            generated_at: Utc::now(),
            interval_width,
            items: Vec::new(),
        }
    }

    /// Record an item under the plot file it was actually rendered to
    pub fn push(&mut self, forecast: &ItemForecast, plot_file: impl Into<String>) {
        let mut item = ItemSummary::from(forecast);
        item.plot_file = plot_file.into();
        self.items.push(item);
    }

    /// Entry for a plot file name
    pub fn find_by_plot(&self, plot_file: &str) -> Option<&ItemSummary> {
        self.items.iter().find(|i| i.plot_file == plot_file)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
