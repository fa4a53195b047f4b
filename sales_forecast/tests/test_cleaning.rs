use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::cleaning::{basic_stats, Cleaner};
use sales_forecast::config::{CleaningConfig, ColumnConfig};
use sales_forecast::data::{TransactionLoader, TransactionRecord};

const EXPORT: &str = "\
Date,Time,Category,Item,Qty,Net Sales
2025-01-07,08:01:00,Croissant,Plain Croissant,3,$10.50
2025-01-07,08:05:00,Pastries,Egg Tart,2,$7.00
2025-01-08,09:12:00,Pastries,Berry Tart ,1,$6.25
2025-01-06,10:00:00,Croissant,Plain Croissant,5,$17.50
2025-01-14,10:00:00,Croissant,Plain Croissant,4,$14.00
2025-01-09,11:00:00,Coffee,Latte,1,$5.00
2025-01-09,11:30:00,Pastries,Easter Special Bun,2,$9.00
2025-01-10,12:00:00,Drink,Lemonade,1,\"$1,000.00\"
not a date,12:00:00,Croissant,Plain Croissant,1,$3.50
2025-01-11,12:30:00,Croissant,,1,$3.50
2025-01-11,12:45:00,Croissant,Plain Croissant,many,$3.50
";

fn load() -> Vec<TransactionRecord> {
    let set = TransactionLoader::from_reader(EXPORT.as_bytes(), &ColumnConfig::default()).unwrap();
    assert_eq!(set.skipped_rows, 3);
    set.records
}

#[test]
fn test_loader_parses_optional_columns() {
    let records = load();
    assert_eq!(records.len(), 8);
    assert_eq!(records[0].category.as_deref(), Some("Croissant"));
    assert_eq!(records[0].net_sales, Some(10.5));
    assert_eq!(records[7].net_sales, Some(1000.0));
}

#[test]
fn test_loader_requires_quantity_column() {
    let export = "Date,Item\n2025-01-07,Plain Croissant\n";
    let result = TransactionLoader::from_reader(export.as_bytes(), &ColumnConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_clean_applies_every_stage() {
    let records = load();
    let cleaner = Cleaner::new(&CleaningConfig::default());
    let cleaned = cleaner.clean(&records);

    // Latte is not on the allow-list
    assert_eq!(cleaned.report.after_category_filter, 7);
    // 2025-01-06 is a Monday
    assert_eq!(cleaned.report.after_closed_day_filter, 6);
    // 1/14 is excluded in any year
    assert_eq!(cleaned.report.after_excluded_days, 5);
    assert_eq!(cleaned.report.removed_special_rows, 1);
    assert_eq!(cleaned.report.final_rows, 4);

    let items: Vec<&str> = cleaned.records.iter().map(|r| r.item.as_str()).collect();
    assert_eq!(
        items,
        vec!["Plain Croissant", "Crispy Egg Tart", "Berry Tart", "Lemonade"]
    );
}

#[test]
fn test_clean_without_closed_day() {
    let records = load();
    let config = CleaningConfig {
        closed_weekday: None,
        excluded_days: Vec::new(),
        ..CleaningConfig::default()
    };
    let cleaned = Cleaner::new(&config).clean(&records);

    assert_eq!(cleaned.report.after_closed_day_filter, 7);
    assert_eq!(cleaned.report.after_excluded_days, 7);
}

#[rstest]
#[case("Dubaï Chocolate Croissant", "Dubai Chocolate Croissant")]
#[case("Red Bow Tie Croissant - Weekend Only", "Red Bow Tie Croissant")]
#[case("Lemon Tart (L)", "Lemon Tart (Large)")]
#[case("Raspberry Tart(S)", "Raspberry Tart (Small)")]
#[case("  CroqueMonsieur ", "Croque Monsieur")]
#[case("Sourdough Loaf", "Sourdough Loaf")]
fn test_canonical_names(#[case] raw: &str, #[case] expected: &str) {
    let cleaner = Cleaner::new(&CleaningConfig::default());
    assert_eq!(cleaner.canonical_name(raw), expected);
    assert_eq!(cleaner.canonical_name(expected), expected);
}

#[rstest]
#[case("4th of July Cookie", true)]
#[case("EASTER SPECIAL box", true)]
#[case("Plain Croissant", false)]
fn test_excluded_items(#[case] name: &str, #[case] excluded: bool) {
    let cleaner = Cleaner::new(&CleaningConfig::default());
    assert_eq!(cleaner.is_excluded_item(name), excluded);
}

#[test]
fn test_basic_stats() {
    let records = load();
    let cleaned = Cleaner::new(&CleaningConfig::default()).clean(&records);
    let stats = basic_stats(&records, &cleaned.records);

    assert_eq!(stats.total_quantity, 7.0);
    assert_eq!(stats.unique_items, 4);
    assert_eq!(stats.unique_categories, 3);
    // Monday 1/6 and the excluded 1/14 still bound the reported period
    assert_eq!(
        stats.date_range,
        Some((
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 14).unwrap()
        ))
    );
    let cleaned_range = cleaned.records.iter().map(|r| r.date).max();
    assert_eq!(cleaned_range, NaiveDate::from_ymd_opt(2025, 1, 10));

    let empty = basic_stats(&[], &[]);
    assert_eq!(empty.unique_items, 0);
    assert_eq!(empty.date_range, None);
}
