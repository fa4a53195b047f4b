//! Additive trend plus seasonality model
//!
//! `y(t) = a + b * t + sum_k (c_k sin(2 pi k t / P) + d_k cos(2 pi k t / P))`
//! fitted by ordinary least squares, with `t` measured from the first
//! training observation. Intervals come from the OLS prediction standard
//! error scaled by the normal quantile of the requested coverage.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastPoint, ForecastResult, TrainedForecastModel};
use crate::series::WeekdaySeries;
use chrono::{Duration, NaiveDate};
use sales_math::{LeastSquares, LeastSquaresFit};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

/// Days between consecutive observations of a weekday series
const WEEK_DAYS: i64 = 7;

/// Additive trend and Fourier seasonality model
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    name: String,
    interval_width: f64,
    seasonality_period_days: f64,
    seasonality_order: usize,
}

/// Trained additive model
#[derive(Debug, Clone)]
pub struct TrainedAdditiveModel {
    name: String,
    fit: LeastSquaresFit,
    origin: NaiveDate,
    training_dates: Vec<NaiveDate>,
    last_date: NaiveDate,
    interval_width: f64,
    /// Normal quantile for the two-sided interval
    z_score: f64,
    seasonality_period_days: f64,
    seasonality_order: usize,
}

impl AdditiveModel {
    /// Create a trend-only model with the given interval coverage
    pub fn new(interval_width: f64) -> Result<Self> {
        if !(interval_width > 0.0 && interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Interval width must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: "Additive trend".to_string(),
            interval_width,
            seasonality_period_days: 365.25,
            seasonality_order: 0,
        })
    }

    /// Add Fourier seasonality with `order` sine/cosine pairs of the given period
    pub fn with_seasonality(mut self, period_days: f64, order: usize) -> Result<Self> {
        if order > 0 && period_days <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Seasonality period must be positive".to_string(),
            ));
        }

        self.seasonality_period_days = period_days;
        self.seasonality_order = order;
        self.name = if order > 0 {
            format!("Additive trend + seasonality (period={}d, order={})", period_days, order)
        } else {
            "Additive trend".to_string()
        };
        Ok(self)
    }

    /// Build the model described by the forecast configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(config.interval_width)?
            .with_seasonality(config.seasonality_period_days, config.seasonality_order)
    }

    /// Number of regressors in the design matrix
    pub fn regressors(&self) -> usize {
        2 + 2 * self.seasonality_order
    }
}

fn design_row(days: f64, period: f64, order: usize) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + 2 * order);
    row.push(1.0);
    // Trend in weeks keeps the coefficients on the scale of the data
    row.push(days / WEEK_DAYS as f64);
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * days / period;
        row.push(angle.sin());
        row.push(angle.cos());
    }
    row
}

impl ForecastModel for AdditiveModel {
    type Trained = TrainedAdditiveModel;

    fn train(&self, series: &WeekdaySeries) -> Result<Self::Trained> {
        let dates = series.trimmed_dates();
        let values = series.trimmed_values();

        let (Some(&origin), Some(&last_date)) = (dates.first(), dates.last()) else {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        };
        if dates.len() <= self.regressors() {
            return Err(ForecastError::ForecastingError(format!(
                "{} observations cannot fit {} regressors",
                dates.len(),
                self.regressors()
            )));
        }

        let design: Vec<Vec<f64>> = dates
            .iter()
            .map(|d| {
                design_row(
                    (*d - origin).num_days() as f64,
                    self.seasonality_period_days,
                    self.seasonality_order,
                )
            })
            .collect();
        let fit = LeastSquares::fit(&design, values)?;

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::ForecastingError(e.to_string()))?;
        let z_score = normal.inverse_cdf(0.5 + self.interval_width / 2.0);

        Ok(TrainedAdditiveModel {
            name: self.name.clone(),
            fit,
            origin,
            training_dates: dates.to_vec(),
            last_date,
            interval_width: self.interval_width,
            z_score,
            seasonality_period_days: self.seasonality_period_days,
            seasonality_order: self.seasonality_order,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedAdditiveModel {
    fn row_for(&self, date: NaiveDate) -> Vec<f64> {
        design_row(
            (date - self.origin).num_days() as f64,
            self.seasonality_period_days,
            self.seasonality_order,
        )
    }

    /// Fitted coefficients: intercept, weekly trend, then Fourier pairs
    pub fn coefficients(&self) -> &[f64] {
        self.fit.coefficients()
    }
}

impl TrainedForecastModel for TrainedAdditiveModel {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        let mut points = Vec::with_capacity(horizons);

        for step in 1..=horizons as i64 {
            let date = self.last_date + Duration::days(WEEK_DAYS * step);
            let row = self.row_for(date);
            let value = self.fit.predict(&row)?;
            let margin = self.z_score * self.fit.prediction_std_error(&row)?;

            points.push(ForecastPoint {
                date,
                value,
                lower: value - margin,
                upper: value + margin,
            });
        }

        ForecastResult::new(points, self.interval_width)
    }

    fn fitted(&self) -> Vec<f64> {
        self.training_dates
            .iter()
            .filter_map(|d| self.fit.predict(&self.row_for(*d)).ok())
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
