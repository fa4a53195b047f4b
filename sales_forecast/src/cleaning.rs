//! Row filtering and item name consolidation
//!
//! Stages run in a fixed order: category allow-list, closed weekday,
//! excluded calendar days, rename map, seasonal item exclusion.

use crate::config::{CleaningConfig, ExcludedDay};
use crate::data::TransactionRecord;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::info;

/// Applies the cleaning rules of a `CleaningConfig`
#[derive(Debug, Clone)]
pub struct Cleaner {
    categories: HashSet<String>,
    closed_weekday: Option<Weekday>,
    excluded_days: Vec<ExcludedDay>,
    rename_lookup: HashMap<String, String>,
    /// Lower-cased exclusion patterns
    exclude_patterns: Vec<String>,
}

/// Row counts after each cleaning stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub total_rows: usize,
    pub after_category_filter: usize,
    pub after_closed_day_filter: usize,
    pub after_excluded_days: usize,
    pub items_before_rename: usize,
    pub items_after_rename: usize,
    pub removed_special_rows: usize,
    pub final_rows: usize,
}

/// Cleaned transactions together with the stage report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedTransactions {
    pub records: Vec<TransactionRecord>,
    pub report: CleaningReport,
}

/// Headline numbers of a cleaned data set
#[derive(Debug, Clone, PartialEq)]
pub struct BasicStats {
    pub total_quantity: f64,
    pub unique_items: usize,
    pub unique_categories: usize,
    /// First and last day of the whole export, before any filtering
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl Cleaner {
    /// Build a cleaner from configuration
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            categories: config.categories.iter().cloned().collect(),
            closed_weekday: config.closed_weekday,
            excluded_days: config.excluded_days.clone(),
            rename_lookup: config.rename_lookup(),
            exclude_patterns: config
                .exclude_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Whether the category is on the allow-list
    pub fn allows_category(&self, category: Option<&str>) -> bool {
        category.is_some_and(|c| self.categories.contains(c))
    }

    /// Whether the shop was open and the day is not excluded
    pub fn keeps_date(&self, date: NaiveDate) -> bool {
        Some(date.weekday()) != self.closed_weekday
            && !self.excluded_days.iter().any(|day| day.matches(date))
    }

    /// Canonical name for an item name variant.
    ///
    /// Canonical names map to themselves, so applying this twice is the same
    /// as applying it once.
    pub fn canonical_name(&self, name: &str) -> String {
        if let Some(target) = self.rename_lookup.get(name) {
            return target.clone();
        }
        let trimmed = name.trim();
        self.rename_lookup
            .get(trimmed)
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    /// Whether the item is a known one-off seasonal special
    pub fn is_excluded_item(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.exclude_patterns.iter().any(|p| lower.contains(p.as_str()))
    }

    /// Run every cleaning stage over the raw records
    pub fn clean(&self, records: &[TransactionRecord]) -> CleanedTransactions {
        let mut report = CleaningReport {
            total_rows: records.len(),
            ..Default::default()
        };

        let by_category: Vec<&TransactionRecord> = records
            .iter()
            .filter(|r| self.allows_category(r.category.as_deref()))
            .collect();
        report.after_category_filter = by_category.len();

        let open_days: Vec<&TransactionRecord> = by_category
            .into_iter()
            .filter(|r| Some(r.date.weekday()) != self.closed_weekday)
            .collect();
        report.after_closed_day_filter = open_days.len();

        let kept_days: Vec<&TransactionRecord> = open_days
            .into_iter()
            .filter(|r| self.keeps_date(r.date))
            .collect();
        report.after_excluded_days = kept_days.len();

        report.items_before_rename = kept_days
            .iter()
            .map(|r| r.item.as_str())
            .collect::<HashSet<_>>()
            .len();

        let renamed: Vec<TransactionRecord> = kept_days
            .into_iter()
            .map(|r| TransactionRecord {
                item: self.canonical_name(&r.item),
                ..r.clone()
            })
            .collect();
        report.items_after_rename = renamed
            .iter()
            .map(|r| r.item.as_str())
            .collect::<HashSet<_>>()
            .len();

        let before_special = renamed.len();
        let cleaned: Vec<TransactionRecord> = renamed
            .into_iter()
            .filter(|r| !self.is_excluded_item(&r.item))
            .collect();
        report.removed_special_rows = before_special - cleaned.len();
        report.final_rows = cleaned.len();

        info!(
            total = report.total_rows,
            after_category = report.after_category_filter,
            after_closed_day = report.after_closed_day_filter,
            after_excluded_days = report.after_excluded_days,
            "Filtered transactions"
        );
        info!(
            "Items before cleaning: {}, after cleaning: {}, merged through mapping: {}",
            report.items_before_rename,
            report.items_after_rename,
            report.items_before_rename - report.items_after_rename
        );
        info!(
            "Removed {} transactions for seasonal/special items",
            report.removed_special_rows
        );

        CleanedTransactions {
            records: cleaned,
            report,
        }
    }
}

/// Summarise cleaned records; the period is taken from the loaded export
pub fn basic_stats(loaded: &[TransactionRecord], records: &[TransactionRecord]) -> BasicStats {
    let items: BTreeSet<&str> = records.iter().map(|r| r.item.as_str()).collect();
    let categories: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.category.as_deref())
        .collect();
    let date_range = loaded
        .iter()
        .map(|r| r.date)
        .min()
        .zip(loaded.iter().map(|r| r.date).max());

    BasicStats {
        total_quantity: records.iter().map(|r| r.quantity).sum(),
        unique_items: items.len(),
        unique_categories: categories.len(),
        date_range,
    }
}
