//! Per-item weekday series
//!
//! Demand is strongly weekday-seasonal, so each item's history is split
//! into one series per weekday and every series is forecast on its own.

use crate::error::{ForecastError, Result};
use crate::pivot::QuantityTable;
use chrono::{Datelike, NaiveDate, Weekday};
use sales_math::{pre_introduction_len, TrimPolicy};

/// Weekdays the shop is open, starting with the day after the closed day.
///
/// With no closed day the week runs Monday to Sunday.
pub fn weekday_slots(closed_weekday: Option<Weekday>) -> Vec<Weekday> {
    match closed_weekday {
        Some(closed) => {
            let mut slots = Vec::with_capacity(6);
            let mut day = closed.succ();
            while day != closed {
                slots.push(day);
                day = day.succ();
            }
            slots
        }
        None => {
            let mut slots = Vec::with_capacity(7);
            let mut day = Weekday::Mon;
            for _ in 0..7 {
                slots.push(day);
                day = day.succ();
            }
            slots
        }
    }
}

/// Full English name of a weekday
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One item's quantities on a single weekday, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdaySeries {
    weekday: Weekday,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    /// Observations before this index belong to the pre-introduction period
    trim_index: usize,
}

impl WeekdaySeries {
    /// Create a series, locating its pre-introduction run
    pub fn new(
        weekday: Weekday,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
        zero_run_threshold: usize,
        trim_policy: TrimPolicy,
    ) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::ValidationError(format!(
                "Series has {} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        if let Some(date) = dates.iter().find(|d| d.weekday() != weekday) {
            return Err(ForecastError::ValidationError(format!(
                "{} is not a {}",
                date, weekday
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ForecastError::ValidationError(
                "Series dates must be strictly increasing".to_string(),
            ));
        }

        let trim_index = pre_introduction_len(&values, zero_run_threshold, trim_policy);
        Ok(Self {
            weekday,
            dates,
            values,
            trim_index,
        })
    }

    /// Extract an item's series for one weekday from the quantity table
    pub fn from_table(
        table: &QuantityTable,
        item: &str,
        weekday: Weekday,
        zero_run_threshold: usize,
        trim_policy: TrimPolicy,
    ) -> Result<Self> {
        let row = table.row(item).ok_or_else(|| {
            ForecastError::DataError(format!("Item '{}' not found in quantity table", item))
        })?;

        let mut points: Vec<(NaiveDate, f64)> = table
            .dates()
            .iter()
            .zip(row)
            .filter(|(date, _)| date.weekday() == weekday)
            .map(|(date, value)| (*date, *value))
            .collect();
        points.sort_by_key(|(date, _)| *date);

        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = points.into_iter().unzip();
        Self::new(weekday, dates, values, zero_run_threshold, trim_policy)
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// All observation dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// All observed quantities, including the pre-introduction period
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of leading observations excluded from fitting
    pub fn trim_index(&self) -> usize {
        self.trim_index
    }

    /// Dates after the pre-introduction period
    pub fn trimmed_dates(&self) -> &[NaiveDate] {
        &self.dates[self.trim_index..]
    }

    /// Quantities after the pre-introduction period
    pub fn trimmed_values(&self) -> &[f64] {
        &self.values[self.trim_index..]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
