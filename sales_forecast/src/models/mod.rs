//! Forecasting models for weekday series

use crate::error::{ForecastError, Result};
use crate::series::WeekdaySeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod additive;

pub use additive::{AdditiveModel, TrainedAdditiveModel};

/// One forecast step with its prediction interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Forecast result containing predicted values and interval bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    /// Coverage of the intervals, e.g. 0.8
    interval_width: f64,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(points: Vec<ForecastPoint>, interval_width: f64) -> Result<Self> {
        if !(interval_width > 0.0 && interval_width < 1.0) {
            return Err(ForecastError::ValidationError(
                "Interval width must be between 0 and 1".to_string(),
            ));
        }
        if let Some(point) = points
            .iter()
            .find(|p| !(p.lower <= p.value && p.value <= p.upper))
        {
            return Err(ForecastError::ValidationError(format!(
                "Forecast for {} lies outside its interval",
                point.date
            )));
        }

        Ok(Self {
            points,
            interval_width,
        })
    }

    /// Forecast steps in date order
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Get the forecasted values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.points.len()
    }

    /// First forecast step
    pub fn next(&self) -> Option<&ForecastPoint> {
        self.points.first()
    }

    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }

    /// Calculate mean absolute error between forecast and actual values
    pub fn mean_absolute_error(&self, actual: &[f64]) -> Result<f64> {
        if self.points.len() != actual.len() || actual.is_empty() {
            return Err(ForecastError::ValidationError(format!(
                "Forecast length ({}) doesn't match actual length ({})",
                self.points.len(),
                actual.len()
            )));
        }

        let sum: f64 = self
            .points
            .iter()
            .zip(actual)
            .map(|(p, a)| (p.value - a).abs())
            .sum();

        Ok(sum / actual.len() as f64)
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// In-sample fitted values for the observations the model was trained on
    fn fitted(&self) -> Vec<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a weekday series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the post-introduction part of a series
    fn train(&self, series: &WeekdaySeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}
