//! Typed cell values

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::schema::ColumnType;

/// Day zero of the spreadsheet serial date system (1899-12-30T00:00:00).
///
/// Day counts accepted by [`datetime_from_day_count`] are relative to this
/// instant, and it is the fill default for date/time columns.
pub fn sheet_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .expect("valid epoch date")
        .and_hms_opt(0, 0, 0)
        .expect("valid epoch time")
}

/// Convert a serial day count into a date-time.
///
/// The whole part is days since [`sheet_epoch`]; the fractional part is the
/// time of day. Returns `None` for non-finite input or out-of-range dates.
pub fn datetime_from_day_count(days: f64) -> Option<NaiveDateTime> {
    if !days.is_finite() {
        return None;
    }
    let whole = days.trunc() as i64;
    let millis = (days.fract() * 86_400_000.0).round() as i64;
    sheet_epoch()
        .checked_add_signed(Duration::days(whole))?
        .checked_add_signed(Duration::milliseconds(millis))
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Generic date parse over the formats the importer recognizes.
pub fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Represents one typed cell in an imported grid
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Null marker (blank cell or unrecoverable coercion)
    Null,

    /// String value
    Text(String),

    /// Exact decimal value (the normalizer's numeric result)
    Decimal(Decimal),

    /// 64-bit integer value
    Integer(i64),

    /// Floating-point value
    Float(f64),

    /// Boolean value
    Boolean(bool),

    /// Date/time value
    DateTime(NaiveDateTime),
}

impl Value {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Check if the value is the null marker
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get the value as a decimal
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            Value::Integer(i) => Some(Decimal::from(*i)),
            Value::Float(f) => Decimal::from_f64(*f),
            _ => None,
        }
    }

    /// Try to get the value as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Decimal(d) => d.to_f64(),
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get the value as a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a date-time
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Decimal(_) => "decimal",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Check whether the value can be stored in a column of `ty` unchanged
    pub fn is_assignable_to(&self, ty: ColumnType) -> bool {
        if ty == ColumnType::Any || self.is_null() {
            return true;
        }
        matches!(
            (self, ty),
            (Value::Text(_), ColumnType::Text)
                | (Value::Decimal(_), ColumnType::Decimal)
                | (Value::Integer(_), ColumnType::Integer)
                | (Value::Float(_), ColumnType::Float)
                | (Value::Boolean(_), ColumnType::Boolean)
                | (Value::DateTime(_), ColumnType::DateTime)
        )
    }

    /// Generic convertible cast to the destination column type.
    ///
    /// Returns `None` when no meaningful conversion exists; callers decide
    /// whether that becomes a log entry plus null or a hard failure.
    pub fn convert_to(&self, ty: ColumnType) -> Option<Value> {
        if self.is_assignable_to(ty) {
            return Some(self.clone());
        }
        match ty {
            ColumnType::Any => Some(self.clone()),
            ColumnType::Text => Some(Value::Text(self.to_string())),
            ColumnType::Decimal => match self {
                Value::Text(s) => s.trim().parse::<Decimal>().ok().map(Value::Decimal),
                Value::Integer(i) => Some(Value::Decimal(Decimal::from(*i))),
                Value::Float(f) => Decimal::from_f64(*f).map(Value::Decimal),
                Value::Boolean(b) => Some(Value::Decimal(Decimal::from(*b as i64))),
                _ => None,
            },
            ColumnType::Integer => match self {
                Value::Decimal(d) => d.round().to_i64().map(Value::Integer),
                Value::Float(f) if f.is_finite() => Some(Value::Integer(f.round() as i64)),
                Value::Text(s) => match s.trim().parse::<i64>() {
                    Ok(i) => Some(Value::Integer(i)),
                    Err(_) => s
                        .trim()
                        .parse::<Decimal>()
                        .ok()
                        .and_then(|d| d.round().to_i64())
                        .map(Value::Integer),
                },
                Value::Boolean(b) => Some(Value::Integer(*b as i64)),
                _ => None,
            },
            ColumnType::Float => match self {
                Value::Decimal(d) => d.to_f64().map(Value::Float),
                Value::Integer(i) => Some(Value::Float(*i as f64)),
                Value::Text(s) => s.trim().parse::<f64>().ok().map(Value::Float),
                Value::Boolean(b) => Some(Value::Float(*b as i64 as f64)),
                _ => None,
            },
            ColumnType::Boolean => match self {
                Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Some(Value::Boolean(true)),
                    "false" => Some(Value::Boolean(false)),
                    _ => None,
                },
                Value::Decimal(d) => Some(Value::Boolean(*d != Decimal::ZERO)),
                Value::Integer(i) => Some(Value::Boolean(*i != 0)),
                Value::Float(f) => Some(Value::Boolean(*f != 0.0)),
                _ => None,
            },
            ColumnType::DateTime => match self {
                Value::Decimal(d) => d.to_f64().and_then(datetime_from_day_count).map(Value::DateTime),
                Value::Integer(i) => datetime_from_day_count(*i as f64).map(Value::DateTime),
                Value::Float(f) => datetime_from_day_count(*f).map(Value::DateTime),
                Value::Text(s) => parse_datetime_text(s)
                    .or_else(|| s.trim().parse::<f64>().ok().and_then(datetime_from_day_count))
                    .map(Value::DateTime),
                _ => None,
            },
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, ""),
            Value::Text(s) => write!(f, "{}", s),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::DateTime(d.and_hms_opt(0, 0, 0).expect("midnight is valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(42), Value::Integer(42));
        assert_eq!(Value::from(3.14), Value::Float(3.14));
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
    }

    #[test]
    fn test_day_count_round_trip() {
        // Day 1 after the epoch is 1899-12-31.
        let dt = datetime_from_day_count(1.0).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(1899, 12, 31).unwrap());

        // 45292 is 2024-01-01 in the serial system.
        let dt = datetime_from_day_count(45292.0).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        // Fractional part carries the time of day.
        let dt = datetime_from_day_count(45292.5).unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "12:00:00");

        assert!(datetime_from_day_count(f64::NAN).is_none());
    }

    #[test]
    fn test_generic_cast() {
        let v = Value::Text("12.5".into());
        assert_eq!(
            v.convert_to(ColumnType::Decimal),
            Some(Value::Decimal("12.5".parse().unwrap()))
        );
        assert_eq!(v.convert_to(ColumnType::Float), Some(Value::Float(12.5)));

        // Banker's rounding on integer casts.
        let d = Value::Decimal("2.5".parse().unwrap());
        assert_eq!(d.convert_to(ColumnType::Integer), Some(Value::Integer(2)));

        assert_eq!(
            Value::Integer(1).convert_to(ColumnType::Boolean),
            Some(Value::Boolean(true))
        );
        assert_eq!(Value::Text("abc".into()).convert_to(ColumnType::Decimal), None);

        // Null is assignable everywhere.
        assert_eq!(Value::Null.convert_to(ColumnType::Integer), Some(Value::Null));
    }

    #[test]
    fn test_datetime_cast_from_day_count() {
        let v = Value::Integer(45292);
        let dt = v.convert_to(ColumnType::DateTime).unwrap();
        assert_eq!(
            dt.as_datetime().unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );

        let v = Value::Text("2024-01-02".into());
        let dt = v.convert_to(ColumnType::DateTime).unwrap();
        assert_eq!(
            dt.as_datetime().unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }
}
