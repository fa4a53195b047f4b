//! Per-item forecasting across weekday slots
//!
//! Each weekday series is forecast independently. A series that cannot be
//! forecast is marked unavailable with a reason; it never fails the run.

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::models::{AdditiveModel, ForecastModel, ForecastResult, TrainedForecastModel};
use crate::pivot::QuantityTable;
use crate::series::WeekdaySeries;
use chrono::Weekday;
use sales_math::statistics;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Why a weekday series has no forecast
#[derive(Debug, Clone, PartialEq)]
pub enum UnavailableReason {
    /// Fewer raw observations than required
    InsufficientHistory { observations: usize, required: usize },
    /// Nothing was ever sold on this weekday
    NoSales,
    /// Too little history left after the pre-introduction period
    InsufficientPostIntroduction { observations: usize, required: usize },
    /// The model could not be fitted
    ModelFailed(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientHistory {
                observations,
                required,
            } => write!(f, "insufficient history ({} of {} observations)", observations, required),
            Self::NoSales => write!(f, "no sales recorded"),
            Self::InsufficientPostIntroduction {
                observations,
                required,
            } => write!(
                f,
                "insufficient history after introduction ({} of {} observations)",
                observations, required
            ),
            Self::ModelFailed(msg) => write!(f, "model failed: {}", msg),
        }
    }
}

/// Forecast outcome of one weekday series
#[derive(Debug, Clone, PartialEq)]
pub enum WeekdayForecast {
    Available(ForecastResult),
    Unavailable(UnavailableReason),
}

impl WeekdayForecast {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// The forecast, if one was produced
    pub fn result(&self) -> Option<&ForecastResult> {
        match self {
            Self::Available(result) => Some(result),
            Self::Unavailable(_) => None,
        }
    }
}

/// Headline statistics shown on each grid panel and the detail page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdayStats {
    pub average: f64,
    pub maximum: f64,
    /// First forecast value, when a forecast exists
    pub next: Option<f64>,
}

/// A weekday series together with its forecast outcome
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayOutcome {
    pub series: WeekdaySeries,
    pub forecast: WeekdayForecast,
}

impl WeekdayOutcome {
    /// Average and maximum over post-introduction data when a forecast
    /// exists, over the full history otherwise
    pub fn stats(&self) -> WeekdayStats {
        let values = match &self.forecast {
            WeekdayForecast::Available(_) => self.series.trimmed_values(),
            WeekdayForecast::Unavailable(_) => self.series.values(),
        };

        WeekdayStats {
            average: statistics::mean(values).unwrap_or(0.0),
            maximum: statistics::max(values).unwrap_or(0.0),
            next: self
                .forecast
                .result()
                .and_then(|r| r.next())
                .map(|p| p.value),
        }
    }
}

/// Forecasts for every weekday slot of one item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemForecast {
    pub item: String,
    pub weekdays: Vec<WeekdayOutcome>,
}

impl ItemForecast {
    /// Number of weekday slots with a forecast
    pub fn available_count(&self) -> usize {
        self.weekdays
            .iter()
            .filter(|w| w.forecast.is_available())
            .count()
    }

    /// Outcome for a given weekday
    pub fn weekday(&self, weekday: Weekday) -> Option<&WeekdayOutcome> {
        self.weekdays.iter().find(|w| w.series.weekday() == weekday)
    }
}

/// Forecast a single weekday series
pub fn forecast_series(series: &WeekdaySeries, config: &ForecastConfig) -> WeekdayForecast {
    if series.len() < config.min_observations {
        return WeekdayForecast::Unavailable(UnavailableReason::InsufficientHistory {
            observations: series.len(),
            required: config.min_observations,
        });
    }
    if statistics::sum(series.values()) == 0.0 {
        return WeekdayForecast::Unavailable(UnavailableReason::NoSales);
    }

    let trimmed = series.trimmed_values().len();
    if trimmed < config.min_fit_observations {
        return WeekdayForecast::Unavailable(UnavailableReason::InsufficientPostIntroduction {
            observations: trimmed,
            required: config.min_fit_observations,
        });
    }

    let attempt = AdditiveModel::from_config(config)
        .and_then(|model| model.train(series))
        .and_then(|trained| trained.forecast(config.horizon));

    match attempt {
        Ok(result) => WeekdayForecast::Available(result),
        Err(err) => WeekdayForecast::Unavailable(UnavailableReason::ModelFailed(err.to_string())),
    }
}

/// Forecast every weekday slot of an item
pub fn forecast_item(
    table: &QuantityTable,
    item: &str,
    weekdays: &[Weekday],
    config: &ForecastConfig,
) -> Result<ItemForecast> {
    let mut outcomes = Vec::with_capacity(weekdays.len());

    for &weekday in weekdays {
        let series = WeekdaySeries::from_table(
            table,
            item,
            weekday,
            config.zero_run_threshold,
            config.trim_policy,
        )?;
        let forecast = forecast_series(&series, config);

        if let WeekdayForecast::Unavailable(reason) = &forecast {
            debug!(item, weekday = %weekday, %reason, "Forecast unavailable");
        }
        outcomes.push(WeekdayOutcome { series, forecast });
    }

    Ok(ItemForecast {
        item: item.to_string(),
        weekdays: outcomes,
    })
}
