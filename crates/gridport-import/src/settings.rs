//! Import configuration

use std::collections::HashMap;

use gridport_core::{letters_to_index, Error, Result, Schema};
use rust_decimal::Decimal;

/// Which worksheet an import reads from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelector {
    /// The workbook's active sheet
    #[default]
    Active,
    /// A sheet by name (exact match)
    Name(String),
    /// A sheet by 0-based position
    Index(usize),
}

/// Start of a contiguous column binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnStart {
    /// Explicit 0-based source column index
    Index(usize),
    /// Spreadsheet column letters, e.g. `"C"` or `"AA"`
    Letter(String),
}

impl ColumnStart {
    /// Resolve to a 0-based source column index
    pub fn resolve(&self) -> Result<usize> {
        match self {
            ColumnStart::Index(i) => Ok(*i),
            ColumnStart::Letter(s) => letters_to_index(s),
        }
    }
}

/// How header cells map to destination columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HeaderMode {
    /// Take columns in sheet order, synthesizing names for blank headers
    #[default]
    None,
    /// Destination column `i` binds to the listed source index at position `i`
    IndexList(Vec<usize>),
    /// Destination column `i` binds to `start + i`
    StartIndex(ColumnStart),
    /// Destination columns match header text case-insensitively
    ByName,
    /// Bindings come from the dispersed column maps
    Dispersed,
}

impl HeaderMode {
    /// Modes that only make sense against a pre-built destination schema
    pub fn requires_schema(&self) -> bool {
        matches!(
            self,
            HeaderMode::IndexList(_) | HeaderMode::StartIndex(_) | HeaderMode::ByName
        )
    }
}

/// Everything that shapes one import.
///
/// Plain data: construct with `Default` and assign the fields you need.
/// [`ImportSettings::validate`] catches inconsistent combinations up front so
/// reads fail before any I/O.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub sheet: SheetSelector,
    /// Whether the sheet carries a header row
    pub has_header: bool,
    /// 0-based header row index
    pub header_row: usize,
    /// 0-based first data row index
    pub data_row: usize,
    pub mode: HeaderMode,
    /// Header renames keyed by absolute source column index
    pub renames_by_index: HashMap<usize, String>,
    /// Header renames keyed by header text (case-insensitive)
    pub renames_by_name: HashMap<String, String>,
    /// Dispersed bindings keyed by column letters (`"A"`, `"AB"`, ...)
    pub dispersed_by_letter: HashMap<String, String>,
    /// Dispersed bindings keyed by 0-based source index
    pub dispersed_by_index: HashMap<usize, String>,
    /// First source column of the import window
    pub start_column: usize,
    /// Width of the import window; `None` reads to the end of the row
    pub column_count: Option<usize>,
    /// Treat `(...)`-wrapped cells as negative numbers
    pub bracket_negative: bool,
    /// When bracketed: `true` negates the inner number, `false` substitutes
    /// `bracket_default` (or keeps the bracketed text when no default is set)
    pub bracket_as_numeric: bool,
    pub bracket_default: Option<Decimal>,
    /// Custom negative-number pattern; capture group 1 holds the magnitude
    pub negative_pattern: Option<String>,
    /// Accept 8-digit `YYYYMMDD` text into date columns
    pub accept_numeric_as_date: bool,
    /// Message key for the numeric-as-date diagnostic
    pub date_warning_key: String,
    /// Name prefix for blank headers, e.g. `"Column"` -> `Column3`
    pub header_prefix: String,
    /// Locale-specific prefixes overriding `header_prefix`
    pub header_prefix_by_locale: HashMap<String, String>,
    /// Locale tag selecting from `header_prefix_by_locale`
    pub locale: Option<String>,
    /// Drop blank-header columns instead of synthesizing names
    pub ignore_blank_headers: bool,
    /// Pre-built destination schema; required by the explicit binding modes
    pub schema: Option<Schema>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            sheet: SheetSelector::Active,
            has_header: true,
            header_row: 0,
            data_row: 1,
            mode: HeaderMode::None,
            renames_by_index: HashMap::new(),
            renames_by_name: HashMap::new(),
            dispersed_by_letter: HashMap::new(),
            dispersed_by_index: HashMap::new(),
            start_column: 0,
            column_count: None,
            bracket_negative: false,
            bracket_as_numeric: true,
            bracket_default: None,
            negative_pattern: None,
            accept_numeric_as_date: false,
            date_warning_key: "numeric-as-date".to_string(),
            header_prefix: "Column".to_string(),
            header_prefix_by_locale: HashMap::new(),
            locale: None,
            ignore_blank_headers: false,
            schema: None,
        }
    }
}

impl ImportSettings {
    /// Settings for a headerless sheet read from row 0
    pub fn without_header() -> Self {
        Self {
            has_header: false,
            header_row: 0,
            data_row: 0,
            ..Self::default()
        }
    }

    /// The blank-header prefix after locale selection
    pub fn effective_prefix(&self) -> &str {
        if let Some(locale) = &self.locale {
            if let Some(prefix) = self.header_prefix_by_locale.get(locale) {
                return prefix;
            }
        }
        &self.header_prefix
    }

    /// Check the settings for structural inconsistencies.
    ///
    /// Called once at the start of every read; any error here aborts before
    /// the sheet is touched.
    pub fn validate(&self) -> Result<()> {
        if self.has_header && self.header_row >= self.data_row {
            return Err(Error::Configuration(format!(
                "header row {} must precede data row {}",
                self.header_row, self.data_row
            )));
        }
        if self.mode.requires_schema() && self.schema.is_none() {
            return Err(Error::Configuration(format!(
                "header mode {:?} requires a pre-built destination schema",
                mode_name(&self.mode)
            )));
        }
        if matches!(self.mode, HeaderMode::ByName) && !self.has_header {
            return Err(Error::Configuration(
                "by-name header resolution needs a header row".to_string(),
            ));
        }
        if let HeaderMode::IndexList(list) = &self.mode {
            if list.is_empty() {
                return Err(Error::Configuration(
                    "index-list header resolution given an empty list".to_string(),
                ));
            }
        }
        if let HeaderMode::StartIndex(start) = &self.mode {
            start.resolve()?;
        }
        if matches!(self.mode, HeaderMode::Dispersed)
            && self.dispersed_by_letter.is_empty()
            && self.dispersed_by_index.is_empty()
        {
            return Err(Error::Configuration(
                "dispersed header resolution given no column mappings".to_string(),
            ));
        }
        Ok(())
    }
}

fn mode_name(mode: &HeaderMode) -> &'static str {
    match mode {
        HeaderMode::None => "None",
        HeaderMode::IndexList(_) => "IndexList",
        HeaderMode::StartIndex(_) => "StartIndex",
        HeaderMode::ByName => "ByName",
        HeaderMode::Dispersed => "Dispersed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridport_core::{Column, ColumnType};

    #[test]
    fn test_defaults() {
        let settings = ImportSettings::default();
        assert!(settings.has_header);
        assert_eq!(settings.header_row, 0);
        assert_eq!(settings.data_row, 1);
        assert_eq!(settings.effective_prefix(), "Column");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_header_must_precede_data() {
        let settings = ImportSettings {
            header_row: 2,
            data_row: 2,
            ..ImportSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_explicit_modes_require_schema() {
        let settings = ImportSettings {
            mode: HeaderMode::ByName,
            ..ImportSettings::default()
        };
        assert!(settings.validate().is_err());

        let with_schema = ImportSettings {
            mode: HeaderMode::ByName,
            schema: Some(Schema::from_columns(vec![Column::new(
                "Amount",
                ColumnType::Decimal,
            )])),
            ..ImportSettings::default()
        };
        assert!(with_schema.validate().is_ok());
    }

    #[test]
    fn test_locale_prefix_selection() {
        let mut settings = ImportSettings::default();
        settings
            .header_prefix_by_locale
            .insert("zh-CN".to_string(), "列".to_string());
        settings.locale = Some("zh-CN".to_string());
        assert_eq!(settings.effective_prefix(), "列");

        settings.locale = Some("fr-FR".to_string());
        assert_eq!(settings.effective_prefix(), "Column");
    }

    #[test]
    fn test_column_start_letter() {
        assert_eq!(ColumnStart::Letter("C".to_string()).resolve().unwrap(), 2);
        assert_eq!(ColumnStart::Index(7).resolve().unwrap(), 7);
        assert!(ColumnStart::Letter("5".to_string()).resolve().is_err());
    }
}
