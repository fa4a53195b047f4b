//! The cleaned quantity table: one row per item, one column per day
//!
//! Dates with no transaction for an item hold zero. Columns are ordered by
//! weekday slot (the day after the closed day first) and then by date, so
//! each weekday's history sits in one contiguous block of the CSV.

use crate::data::TransactionRecord;
use crate::error::{ForecastError, Result};
use crate::series::weekday_slots;
use chrono::{Datelike, NaiveDate, Weekday};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Name of the first column of the pivot CSV
pub const ITEM_COLUMN: &str = "Item";

/// Items x dates grid of summed quantities
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuantityTable {
    items: Vec<String>,
    dates: Vec<NaiveDate>,
    /// `quantities[item][date]`
    quantities: Vec<Vec<f64>>,
}

impl QuantityTable {
    /// Pivot cleaned records, summing quantities per item and day
    pub fn from_records(records: &[TransactionRecord], closed_weekday: Option<Weekday>) -> Self {
        let mut sums: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        let mut all_dates = BTreeSet::new();

        for record in records {
            *sums
                .entry(record.item.as_str())
                .or_default()
                .entry(record.date)
                .or_insert(0.0) += record.quantity;
            all_dates.insert(record.date);
        }

        let dates = column_order(all_dates.into_iter().collect(), closed_weekday);
        let items: Vec<String> = sums.keys().map(|s| s.to_string()).collect();
        let quantities = sums
            .values()
            .map(|by_date| {
                dates
                    .iter()
                    .map(|d| by_date.get(d).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        Self {
            items,
            dates,
            quantities,
        }
    }

    /// Build a table from parts; every row must have one value per date
    pub fn new(
        items: Vec<String>,
        dates: Vec<NaiveDate>,
        quantities: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if items.len() != quantities.len() {
            return Err(ForecastError::ValidationError(format!(
                "{} items but {} quantity rows",
                items.len(),
                quantities.len()
            )));
        }
        if let Some(row) = quantities.iter().find(|row| row.len() != dates.len()) {
            return Err(ForecastError::ValidationError(format!(
                "Quantity row has {} values for {} dates",
                row.len(),
                dates.len()
            )));
        }

        Ok(Self {
            items,
            dates,
            quantities,
        })
    }

    /// Item names in row order
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Dates in column order
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// `(items, dates)`
    pub fn shape(&self) -> (usize, usize) {
        (self.items.len(), self.dates.len())
    }

    /// Check if the table has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantities of one item in column order
    pub fn row(&self, item: &str) -> Option<&[f64]> {
        self.items
            .iter()
            .position(|i| i == item)
            .map(|idx| self.quantities[idx].as_slice())
    }

    /// Quantity of an item on a date, zero when absent
    pub fn quantity(&self, item: &str, date: NaiveDate) -> f64 {
        let Some(row) = self.row(item) else {
            return 0.0;
        };
        self.dates
            .iter()
            .position(|d| *d == date)
            .map(|idx| row[idx])
            .unwrap_or(0.0)
    }

    /// Sum over every cell
    pub fn total_quantity(&self) -> f64 {
        self.quantities.iter().flatten().sum()
    }

    /// Convert to a polars DataFrame with an `Item` column and one column per date
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let item_names: Vec<&str> = self.items.iter().map(String::as_str).collect();
        let mut columns = Vec::with_capacity(self.dates.len() + 1);
        columns.push(Series::new(ITEM_COLUMN, item_names));

        for (idx, date) in self.dates.iter().enumerate() {
            let values: Vec<f64> = self.quantities.iter().map(|row| row[idx]).collect();
            columns.push(Series::new(&date_header(*date), values));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Build a table from a DataFrame laid out like `to_dataframe`
    pub fn from_dataframe(
        df: &DataFrame,
        legacy_year: i32,
        closed_weekday: Option<Weekday>,
    ) -> Result<Self> {
        let item_series = df.column(ITEM_COLUMN).map_err(|e| {
            ForecastError::DataError(format!("Column '{}' not found: {}", ITEM_COLUMN, e))
        })?;
        let item_series = item_series.cast(&DataType::Utf8)?;
        let items: Vec<String> = item_series
            .utf8()?
            .into_iter()
            .map(|name| name.unwrap_or_default().to_string())
            .collect();

        let mut columns: Vec<(NaiveDate, Vec<f64>)> = Vec::new();
        for series in df.get_columns() {
            if series.name() == ITEM_COLUMN {
                continue;
            }
            let date = parse_date_header(series.name(), legacy_year).ok_or_else(|| {
                ForecastError::DataError(format!("Unrecognised date column '{}'", series.name()))
            })?;
            let values: Vec<f64> = series
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect();
            columns.push((date, values));
        }

        let dates = column_order(columns.iter().map(|(d, _)| *d).collect(), closed_weekday);
        let quantities = (0..items.len())
            .map(|row| {
                dates
                    .iter()
                    .map(|date| {
                        columns
                            .iter()
                            .find(|(d, _)| d == date)
                            .map(|(_, values)| values[row])
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();

        Self::new(items, dates, quantities)
    }

    /// Write the table as CSV
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut df = self.to_dataframe()?;
        let mut file = File::create(path.as_ref())?;
        CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;

        info!(
            "Saved quantity table ({} items x {} dates) to {}",
            self.items.len(),
            self.dates.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Read a table written by `write_csv`
    pub fn read_csv<P: AsRef<Path>>(
        path: P,
        legacy_year: i32,
        closed_weekday: Option<Weekday>,
    ) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        let table = Self::from_dataframe(&df, legacy_year, closed_weekday)?;
        info!(
            "Loaded quantity table: {} items, {} date columns",
            table.items.len(),
            table.dates.len()
        );
        Ok(table)
    }
}

/// Sort dates by weekday slot, then chronologically
fn column_order(mut dates: Vec<NaiveDate>, closed_weekday: Option<Weekday>) -> Vec<NaiveDate> {
    let slots = weekday_slots(closed_weekday);
    let slot_of = |date: &NaiveDate| {
        slots
            .iter()
            .position(|w| *w == date.weekday())
            .unwrap_or(slots.len())
    };
    dates.sort_by_key(|d| (slot_of(d), *d));
    dates.dedup();
    dates
}

/// Column header for a date, e.g. `1/7/2025 - Tuesday`
pub fn date_header(date: NaiveDate) -> String {
    format!("{} - {}", date.format("%-m/%-d/%Y"), date.format("%A"))
}

/// Parse a column header written by `date_header`.
///
/// Headers without a year (`1/7 - Tuesday`) take the year nearest to
/// `legacy_year` on which that day falls on the named weekday, or
/// `legacy_year` itself when the weekday is missing or never matches.
pub fn parse_date_header(header: &str, legacy_year: i32) -> Option<NaiveDate> {
    let (day_part, weekday_part) = match header.split_once(" - ") {
        Some((day, weekday)) => (day.trim(), Some(weekday.trim())),
        None => (header.trim(), None),
    };

    let mut parts = day_part.split('/');
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let year: Option<i32> = match parts.next() {
        Some(y) => Some(y.trim().parse().ok()?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }

    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let weekday = weekday_part.and_then(|w| w.parse::<Weekday>().ok());
    if let Some(weekday) = weekday {
        for offset in 0..=6 {
            for year in [legacy_year + offset, legacy_year - offset] {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    if date.weekday() == weekday {
                        return Some(date);
                    }
                }
            }
        }
    }
    NaiveDate::from_ymd_opt(legacy_year, month, day)
}
