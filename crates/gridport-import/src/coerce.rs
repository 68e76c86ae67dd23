//! Column-type coercion with per-cell diagnostics.
//!
//! Coercion never aborts a read. A cell that cannot be converted to its
//! column's type is logged and stored as null; structural problems are the
//! reader's job, not this module's.

use chrono::{NaiveDate, NaiveDateTime};
use gridport_core::{Column, ColumnType, ImportLog, Value};
use lazy_regex::regex;

use crate::settings::ImportSettings;

/// Detect an 8-digit `YYYYMMDD` date candidate in raw cell text.
///
/// The text must be exactly eight ASCII digits and denote a real calendar
/// date; `20241347` is not a candidate.
pub fn numeric_date_candidate(raw: &str) -> Option<NaiveDateTime> {
    let text = raw.trim();
    if !regex!(r"^\d{8}$").is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Diagnostic text for a detected candidate, selected by message key.
/// Known keys carry a bilingual body; unknown keys fall back to English.
fn date_warning_text(key: &str) -> String {
    match key {
        "numeric-as-date" => {
            "8-digit numeric text looks like a YYYYMMDD date / 8位数字文本疑似YYYYMMDD日期"
                .to_string()
        }
        other => format!("numeric text looks like a YYYYMMDD date ({})", other),
    }
}

/// Converts normalized values into their destination column types
#[derive(Debug)]
pub struct Coercer {
    accept_numeric_as_date: bool,
    date_warning_key: String,
}

impl Coercer {
    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self {
            accept_numeric_as_date: settings.accept_numeric_as_date,
            date_warning_key: settings.date_warning_key.clone(),
        }
    }

    /// Coerce one normalized value into `column`'s type.
    ///
    /// `raw_text` is the cell's original text rendering, used for candidate
    /// detection and log snapshots. Row/column indices are 1-based display
    /// coordinates for the log.
    pub fn coerce(
        &self,
        value: Value,
        raw_text: &str,
        column: &Column,
        row: i64,
        column_index: i64,
        log: &mut ImportLog,
    ) -> Value {
        if let Some(candidate) = numeric_date_candidate(raw_text) {
            log.record(
                row,
                column_index,
                &column.name,
                date_warning_text(&self.date_warning_key),
                Some(raw_text.trim().to_string()),
            );
            if column.ty == ColumnType::DateTime {
                if self.accept_numeric_as_date {
                    return Value::DateTime(candidate);
                }
                // Candidate declined: the value passes through untouched and
                // no other date coercion applies to this cell.
                return value;
            }
        }

        if value.is_assignable_to(column.ty) {
            return value;
        }

        match value.convert_to(column.ty) {
            Some(converted) => converted,
            None => {
                log.record(
                    row,
                    column_index,
                    &column.name,
                    format!(
                        "type conversion failed: cannot convert {} to {}",
                        value.type_name(),
                        column.ty.name()
                    ),
                    Some(raw_text.to_string()),
                );
                Value::Null
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridport_core::datetime_from_day_count;
    use rust_decimal::Decimal;

    fn coercer(accept: bool) -> Coercer {
        Coercer::from_settings(&ImportSettings {
            accept_numeric_as_date: accept,
            ..ImportSettings::default()
        })
    }

    fn date_column() -> Column {
        Column::new("When", ColumnType::DateTime)
    }

    #[test]
    fn test_candidate_detection() {
        assert!(numeric_date_candidate("20240101").is_some());
        assert!(numeric_date_candidate(" 20240101 ").is_some());
        // Not a real calendar date.
        assert!(numeric_date_candidate("20241347").is_none());
        assert!(numeric_date_candidate("2024010").is_none());
        assert!(numeric_date_candidate("202401011").is_none());
        assert!(numeric_date_candidate("2024-01-1").is_none());
    }

    #[test]
    fn test_candidate_accepted_into_date_column() {
        let mut log = ImportLog::new();
        let value = coercer(true).coerce(
            Value::Decimal("20240101".parse::<Decimal>().unwrap()),
            "20240101",
            &date_column(),
            2,
            1,
            &mut log,
        );
        let dt = value.as_datetime().unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        // The warning is logged even when the candidate is accepted.
        assert_eq!(log.len(), 1);
        assert!(log.entries()[0].message.contains("YYYYMMDD"));
    }

    #[test]
    fn test_candidate_declined_skips_date_coercion() {
        let mut log = ImportLog::new();
        let original = Value::Decimal("20240101".parse::<Decimal>().unwrap());
        let value = coercer(false).coerce(
            original.clone(),
            "20240101",
            &date_column(),
            2,
            1,
            &mut log,
        );
        // Untouched: not converted to a day-count date either.
        assert_eq!(value, original);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_candidate_logged_for_non_date_destination() {
        let mut log = ImportLog::new();
        let column = Column::new("Code", ColumnType::Integer);
        let value = coercer(false).coerce(
            Value::Decimal("20240101".parse::<Decimal>().unwrap()),
            "20240101",
            &column,
            3,
            2,
            &mut log,
        );
        assert_eq!(value, Value::Integer(20240101));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_day_count_into_date_column() {
        let mut log = ImportLog::new();
        let value = coercer(false).coerce(
            Value::Float(45292.5),
            "45292.5",
            &date_column(),
            2,
            1,
            &mut log,
        );
        assert_eq!(value.as_datetime(), datetime_from_day_count(45292.5));
        assert!(log.is_empty());
    }

    #[test]
    fn test_failure_logs_and_nulls() {
        let mut log = ImportLog::new();
        let column = Column::new("Amount", ColumnType::Decimal);
        let value = coercer(false).coerce(
            Value::Text("widget".into()),
            "widget",
            &column,
            5,
            3,
            &mut log,
        );
        assert_eq!(value, Value::Null);
        assert_eq!(log.len(), 1);
        let entry = &log.entries()[0];
        assert_eq!((entry.row, entry.column), (5, 3));
        assert!(entry.message.contains("type conversion failed"));
        assert_eq!(entry.raw_value.as_deref(), Some("widget"));
    }

    #[test]
    fn test_null_passes_through_silently() {
        let mut log = ImportLog::new();
        let column = Column::new("Amount", ColumnType::Decimal);
        let value = coercer(false).coerce(Value::Null, "", &column, 1, 1, &mut log);
        assert_eq!(value, Value::Null);
        assert!(log.is_empty());
    }
}
