use chrono::{NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use sales_forecast::data::TransactionRecord;
use sales_forecast::pivot::{date_header, QuantityTable};
use std::fs;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn record(day: &str, item: &str, quantity: f64) -> TransactionRecord {
    TransactionRecord {
        date: date(day),
        item: item.to_string(),
        category: Some("Croissant".to_string()),
        quantity,
        net_sales: None,
    }
}

fn sample_records() -> Vec<TransactionRecord> {
    vec![
        record("2025-01-07", "Plain Croissant", 3.0),
        record("2025-01-07", "Plain Croissant", 2.0),
        record("2025-01-12", "Plain Croissant", 4.0),
        record("2025-01-08", "Almond Croissant", 1.0),
        record("2025-01-14", "Almond Croissant", 6.0),
    ]
}

#[test]
fn test_pivot_is_lossless_and_zero_filled() {
    let records = sample_records();
    let table = QuantityTable::from_records(&records, Some(Weekday::Mon));

    assert_eq!(table.shape(), (2, 4));
    assert_eq!(table.items(), &["Almond Croissant".to_string(), "Plain Croissant".to_string()]);
    assert_eq!(table.total_quantity(), records.iter().map(|r| r.quantity).sum::<f64>());

    assert_eq!(table.quantity("Plain Croissant", date("2025-01-07")), 5.0);
    assert_eq!(table.quantity("Plain Croissant", date("2025-01-08")), 0.0);
    assert_eq!(table.quantity("Almond Croissant", date("2025-01-12")), 0.0);
    assert_eq!(table.quantity("Unknown", date("2025-01-07")), 0.0);
}

#[test]
fn test_columns_grouped_by_weekday_slot() {
    let table = QuantityTable::from_records(&sample_records(), Some(Weekday::Mon));

    // Tuesdays first, then Wednesday, then Sunday
    assert_eq!(
        table.dates(),
        &[date("2025-01-07"), date("2025-01-14"), date("2025-01-08"), date("2025-01-12")]
    );
    assert_eq!(table.row("Almond Croissant"), Some(&[0.0, 6.0, 1.0, 0.0][..]));
}

#[test]
fn test_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quantity_per_day_per_item.csv");

    let table = QuantityTable::from_records(&sample_records(), Some(Weekday::Mon));
    table.write_csv(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("Item,"));
    assert!(header.contains(&date_header(date("2025-01-07"))));

    let loaded = QuantityTable::read_csv(&path, 2024, Some(Weekday::Mon)).unwrap();
    assert_eq!(loaded, table);
}

#[test]
fn test_reads_legacy_headers_without_year() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.csv");
    fs::write(
        &path,
        "Item,1/7 - Tuesday,1/9 - Thursday\nPlain Croissant,4,2\nBerry Tart,0,1\n",
    )
    .unwrap();

    let table = QuantityTable::read_csv(&path, 2024, Some(Weekday::Mon)).unwrap();

    // 1/7 and 1/9 fall on Tuesday and Thursday in 2025
    assert_eq!(table.dates(), &[date("2025-01-07"), date("2025-01-09")]);
    assert_eq!(table.quantity("Plain Croissant", date("2025-01-07")), 4.0);
    assert_eq!(table.quantity("Berry Tart", date("2025-01-09")), 1.0);
}

#[test]
fn test_read_rejects_unknown_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "Item,Total\nPlain Croissant,4\n").unwrap();

    assert!(QuantityTable::read_csv(&path, 2024, Some(Weekday::Mon)).is_err());
}
