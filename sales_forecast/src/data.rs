//! Transaction export loading
//!
//! The point-of-sale export has many columns; only the date, item,
//! category and quantity (plus net sales, when present) are read. Rows that
//! lack a usable date, item or quantity are skipped and counted rather than
//! failing the load.

use crate::config::ColumnConfig;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// A single line of the transaction export
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub item: String,
    /// Missing categories are kept as `None` and never pass the category filter
    pub category: Option<String>,
    pub quantity: f64,
    pub net_sales: Option<f64>,
}

/// Outcome of loading an export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSet {
    pub records: Vec<TransactionRecord>,
    /// Rows dropped because a required field was missing or malformed
    pub skipped_rows: usize,
}

/// Loader for raw transaction exports
#[derive(Debug)]
pub struct TransactionLoader;

/// Positions of the needed columns in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    item: usize,
    category: Option<usize>,
    quantity: usize,
    net_sales: Option<usize>,
}

impl TransactionLoader {
    /// Load transactions from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, columns: &ColumnConfig) -> Result<TransactionSet> {
        let file = File::open(path.as_ref())?;
        info!("Loading transaction data from {}", path.as_ref().display());
        Self::from_reader(file, columns)
    }

    /// Load transactions from any CSV source
    pub fn from_reader<R: Read>(reader: R, columns: &ColumnConfig) -> Result<TransactionSet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let index = Self::locate_columns(&headers, columns)?;

        let mut set = TransactionSet::default();
        for row in csv_reader.records() {
            // A row the csv parser itself rejects is malformed as well
            let row = match row {
                Ok(row) => row,
                Err(_) => {
                    set.skipped_rows += 1;
                    continue;
                }
            };

            match Self::parse_row(&row, index) {
                Some(record) => set.records.push(record),
                None => set.skipped_rows += 1,
            }
        }

        if set.skipped_rows > 0 {
            warn!("Skipped {} malformed transaction rows", set.skipped_rows);
        }
        info!("Total transactions: {}", set.records.len());
        if let (Some(first), Some(last)) = (
            set.records.iter().map(|r| r.date).min(),
            set.records.iter().map(|r| r.date).max(),
        ) {
            info!("Date range: {} to {}", first, last);
        }

        Ok(set)
    }

    fn locate_columns(headers: &StringRecord, columns: &ColumnConfig) -> Result<ColumnIndex> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                ForecastError::DataError(format!("Column '{}' not found in transaction data", name))
            })
        };

        Ok(ColumnIndex {
            date: require(&columns.date)?,
            item: require(&columns.item)?,
            category: find(&columns.category),
            quantity: require(&columns.quantity)?,
            net_sales: find(&columns.net_sales),
        })
    }

    fn parse_row(row: &StringRecord, index: ColumnIndex) -> Option<TransactionRecord> {
        let date = parse_date(row.get(index.date)?)?;
        let item = row.get(index.item)?;
        if item.trim().is_empty() {
            return None;
        }
        let quantity = parse_number(row.get(index.quantity)?)?;

        let category = index
            .category
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let net_sales = index
            .net_sales
            .and_then(|i| row.get(i))
            .and_then(parse_number);

        Some(TransactionRecord {
            date,
            item: item.to_string(),
            category,
            quantity,
            net_sales,
        })
    }
}

/// Parse the export's date column; time of day is discarded
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // Two-digit years first: `%Y` would also accept "25" as year 25
    for format in ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(timestamp.date());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

/// Parse a numeric cell, tolerating currency symbols and thousands separators
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(parse_date("2025-03-04"), Some(expected));
        assert_eq!(parse_date("03/04/2025"), Some(expected));
        assert_eq!(parse_date("3/4/25"), Some(expected));
        assert_eq!(parse_date("2025-03-04 08:15:00"), Some(expected));
        assert_eq!(parse_date("2025-03-04T08:15:00-08:00"), Some(expected));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("$1,234.50"), Some(1234.5));
        assert_eq!(parse_number(" 3 "), Some(3.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("two"), None);
    }
}
