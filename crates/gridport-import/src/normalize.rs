//! Value normalization: one raw cell string to one typed value.
//!
//! The rules run in a fixed priority order. Earlier rules own their prefix:
//! a leading-minus cell that fails to parse becomes null rather than falling
//! through to the plain-text rule.

use std::str::FromStr;

use gridport_core::{Error, Result, Value};
use regex::Regex;
use rust_decimal::Decimal;

use crate::settings::ImportSettings;
use crate::source::RawValue;

/// Normalizes raw cell text according to the configured negative-number
/// conventions. Built once per read; the custom pattern is compiled here so
/// an invalid pattern fails the read before any row is touched.
#[derive(Debug)]
pub struct ValueNormalizer {
    bracket_negative: bool,
    bracket_as_numeric: bool,
    bracket_default: Option<Decimal>,
    negative_pattern: Option<Regex>,
}

impl ValueNormalizer {
    pub fn from_settings(settings: &ImportSettings) -> Result<Self> {
        let negative_pattern = match &settings.negative_pattern {
            Some(source) => {
                let compiled = Regex::new(source).map_err(|e| Error::ParseFailed {
                    row: -1,
                    column: -1,
                    value: Some(source.clone()),
                    message: format!("invalid custom negative pattern: {}", e),
                })?;
                Some(compiled)
            }
            None => None,
        };
        Ok(Self {
            bracket_negative: settings.bracket_negative,
            bracket_as_numeric: settings.bracket_as_numeric,
            bracket_default: settings.bracket_default,
            negative_pattern,
        })
    }

    /// Normalize one raw cell string.
    ///
    /// A text result is a terminal outcome, not an error; only cells claimed
    /// by a numeric rule that then fail to parse become null.
    pub fn normalize(&self, raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }

        // Leading minus claims the cell outright.
        if trimmed.starts_with('-') {
            return match Decimal::from_str(trimmed) {
                Ok(d) => Value::Decimal(d),
                Err(_) => Value::Null,
            };
        }

        if self.bracket_negative
            && trimmed.len() > 2
            && trimmed.starts_with('(')
            && trimmed.ends_with(')')
        {
            let inner = trimmed[1..trimmed.len() - 1].trim();
            return match Decimal::from_str(inner) {
                Ok(d) if self.bracket_as_numeric => Value::Decimal(-d),
                Ok(_) => match self.bracket_default {
                    Some(placeholder) => Value::Decimal(placeholder),
                    None => Value::Text(trimmed.to_string()),
                },
                Err(_) => Value::Null,
            };
        }

        if let Some(pattern) = &self.negative_pattern {
            if let Some(captures) = pattern.captures(trimmed) {
                if let Some(group) = captures.get(1) {
                    if let Ok(d) = Decimal::from_str(group.as_str().trim()) {
                        return Value::Decimal(-d);
                    }
                    // Matched but unparsable: fall through to the plain parse.
                }
            }
        }

        match Decimal::from_str(trimmed) {
            Ok(d) => Value::Decimal(d),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// Normalize a raw source value. Native numbers, booleans and dates
    /// bypass text normalization entirely.
    pub fn normalize_raw(&self, raw: &RawValue) -> Value {
        match raw {
            RawValue::Empty => Value::Null,
            RawValue::Text(s) => self.normalize(s),
            RawValue::Number(n) => Value::Float(*n),
            RawValue::Boolean(b) => Value::Boolean(*b),
            RawValue::DateTime(dt) => Value::DateTime(*dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(settings: ImportSettings) -> ValueNormalizer {
        ValueNormalizer::from_settings(&settings).unwrap()
    }

    fn dec(s: &str) -> Value {
        Value::Decimal(s.parse().unwrap())
    }

    #[test]
    fn test_blank_is_null() {
        let n = normalizer(ImportSettings::default());
        assert_eq!(n.normalize(""), Value::Null);
        assert_eq!(n.normalize("   "), Value::Null);
        assert_eq!(n.normalize("\t"), Value::Null);
    }

    #[test]
    fn test_leading_minus_never_falls_through() {
        let n = normalizer(ImportSettings::default());
        assert_eq!(n.normalize("-10"), dec("-10"));
        assert_eq!(n.normalize(" -3.25 "), dec("-3.25"));
        // A minus prefix that is not a number is null, not text.
        assert_eq!(n.normalize("-abc"), Value::Null);
    }

    #[test]
    fn test_bracket_negative_as_numeric() {
        let settings = ImportSettings {
            bracket_negative: true,
            bracket_as_numeric: true,
            ..ImportSettings::default()
        };
        let n = normalizer(settings);
        assert_eq!(n.normalize("(123.45)"), dec("-123.45"));
        assert_eq!(n.normalize("( 7 )"), dec("-7"));
        // Unparsable inner text is null.
        assert_eq!(n.normalize("(n/a)"), Value::Null);
        // "()" is too short to qualify and parses as text.
        assert_eq!(n.normalize("()"), Value::Text("()".into()));
    }

    #[test]
    fn test_bracket_negative_as_placeholder() {
        let settings = ImportSettings {
            bracket_negative: true,
            bracket_as_numeric: false,
            bracket_default: Some(Decimal::ZERO),
            ..ImportSettings::default()
        };
        let n = normalizer(settings);
        assert_eq!(n.normalize("(123.45)"), dec("0"));

        let no_default = ImportSettings {
            bracket_negative: true,
            bracket_as_numeric: false,
            ..ImportSettings::default()
        };
        let n = normalizer(no_default);
        assert_eq!(n.normalize("(123.45)"), Value::Text("(123.45)".into()));
    }

    #[test]
    fn test_bracket_disabled_leaves_text() {
        let n = normalizer(ImportSettings::default());
        assert_eq!(n.normalize("(123.45)"), Value::Text("(123.45)".into()));
    }

    #[test]
    fn test_custom_negative_pattern() {
        let settings = ImportSettings {
            negative_pattern: Some(r"^(\d+(?:\.\d+)?)\s*DR$".to_string()),
            ..ImportSettings::default()
        };
        let n = normalizer(settings);
        assert_eq!(n.normalize("12.50 DR"), dec("-12.50"));
        // No match falls through to the plain rules.
        assert_eq!(n.normalize("12.50"), dec("12.50"));
        assert_eq!(n.normalize("hello"), Value::Text("hello".into()));
    }

    #[test]
    fn test_custom_pattern_unparsable_group_falls_through() {
        let settings = ImportSettings {
            negative_pattern: Some(r"^(\w+) owed$".to_string()),
            ..ImportSettings::default()
        };
        let n = normalizer(settings);
        assert_eq!(n.normalize("ten owed"), Value::Text("ten owed".into()));
    }

    #[test]
    fn test_invalid_pattern_is_structural() {
        let settings = ImportSettings {
            negative_pattern: Some("(unclosed".to_string()),
            ..ImportSettings::default()
        };
        let err = ValueNormalizer::from_settings(&settings).unwrap_err();
        assert_eq!(err.kind(), gridport_core::ErrorKind::ParseFailed);
    }

    #[test]
    fn test_plain_parse_and_text_terminal() {
        let n = normalizer(ImportSettings::default());
        assert_eq!(n.normalize("123.45"), dec("123.45"));
        assert_eq!(n.normalize("0"), dec("0"));
        assert_eq!(n.normalize(" widget "), Value::Text("widget".into()));
    }

    #[test]
    fn test_native_values_bypass_text_rules() {
        let n = normalizer(ImportSettings::default());
        assert_eq!(n.normalize_raw(&RawValue::Number(-4.5)), Value::Float(-4.5));
        assert_eq!(n.normalize_raw(&RawValue::Boolean(true)), Value::Boolean(true));
        assert_eq!(n.normalize_raw(&RawValue::Empty), Value::Null);
    }
}
