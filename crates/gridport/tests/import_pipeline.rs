//! End-to-end import tests: CSV file -> typed grid + diagnostics

use std::fs;

use gridport::prelude::*;
use gridport::{Column, ColumnType};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_read_grid_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "orders.csv",
        "Name,Amount,When\nwidget,12.5,2024-01-02\ngadget,(3),20240101\n",
    );

    let settings = ImportSettings {
        bracket_negative: true,
        accept_numeric_as_date: true,
        schema: Some(Schema::from_columns(vec![
            Column::new("Name", ColumnType::Text),
            Column::new("Amount", ColumnType::Decimal),
            Column::new("When", ColumnType::DateTime),
        ])),
        ..ImportSettings::default()
    };
    let import = read_grid(&path, &settings).unwrap();

    assert_eq!(import.grid.row_count(), 2);
    let names: Vec<_> = import.grid.schema().names().collect();
    assert_eq!(names, vec!["Name", "Amount", "When"]);

    // Bracket negative.
    assert_eq!(
        import.grid.value(1, 1),
        Some(&Value::Decimal("-3".parse().unwrap()))
    );
    // Numeric-as-date: accepted into the date column and warned about.
    let when = import.grid.value(1, 2).unwrap().as_datetime().unwrap();
    assert_eq!(when.format("%Y-%m-%d").to_string(), "2024-01-01");
    assert!(import.log.iter().any(|e| e.message.contains("YYYYMMDD")));
}

#[test]
fn test_blank_headers_are_synthesized() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "partial.csv", "Name,,\na,b,c\n");

    let settings = ImportSettings {
        header_prefix: "Col".to_string(),
        ..ImportSettings::default()
    };
    let import = read_grid(&path, &settings).unwrap();
    let names: Vec<_> = import.grid.schema().names().collect();
    assert_eq!(names, vec!["Name", "Col2", "Col3"]);
}

#[test]
fn test_read_matrix_region() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "nums.csv", "a,b,c\n1,2,3\n4,5,6\n7,8,9\n");

    let options = MatrixExportOptions {
        start_row: 1,
        start_column: 1,
        row_count: Some(2),
        column_count: Some(2),
        ..MatrixExportOptions::default()
    };
    let (matrix, log) = read_matrix(&path, &ImportSettings::default(), &options).unwrap();
    assert!(log.is_empty());
    assert_eq!(
        matrix,
        vec![
            vec![
                Value::Decimal("5".parse().unwrap()),
                Value::Decimal("6".parse().unwrap())
            ],
            vec![
                Value::Decimal("8".parse().unwrap()),
                Value::Decimal("9".parse().unwrap())
            ],
        ]
    );
}

#[test]
fn test_missing_file_classification() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_grid(
        dir.path().join("absent.csv"),
        &ImportSettings::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn test_unsupported_extension_classification() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "data.parquet", "not really parquet");
    let err = open_workbook(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
}

#[test]
fn test_empty_file_classification() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "empty.csv", "");
    let err = read_grid(&path, &ImportSettings::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyFile);
}

#[test]
fn test_tsv_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "tabs.tsv", "Name\tQty\nwidget\t3\n");
    let import = read_grid(&path, &ImportSettings::default()).unwrap();
    let names: Vec<_> = import.grid.schema().names().collect();
    assert_eq!(names, vec!["Name", "Qty"]);
    assert_eq!(
        import.grid.value(0, 1),
        Some(&Value::Decimal("3".parse().unwrap()))
    );
}

#[test]
fn test_sheet_named_after_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "orders.csv", "a\n1\n");
    let book = open_workbook(&path).unwrap();
    assert_eq!(book.sheet_names(), vec!["orders"]);
}
