//! Source-side interfaces.
//!
//! The import engine never parses spreadsheet bytes itself. It reads through
//! [`WorkbookSource`]/[`SheetSource`], and format adapters (CSV, or an
//! embedding application's own reader) implement them.

use chrono::NaiveDateTime;
use gridport_core::{Error, Result};

use crate::settings::SheetSelector;

/// A raw cell as the physical reader exposes it, before normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl RawValue {
    /// Blank cells: empty, or text that trims to nothing
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as display text
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => format!("{}", n),
            RawValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            RawValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// One worksheet's cells, as exposed by a format adapter
pub trait SheetSource: std::fmt::Debug {
    fn name(&self) -> &str;

    /// Number of populated rows
    fn row_count(&self) -> usize;

    /// Width of the widest populated row
    fn column_count(&self) -> usize;

    /// Read one cell. `prefer_text` asks the adapter for the cell's display
    /// text rather than its typed value; header rows are read that way.
    /// Out-of-bounds reads return [`RawValue::Empty`].
    fn cell_value(&self, row: usize, column: usize, prefer_text: bool) -> RawValue;
}

/// An open workbook: an ordered collection of sheets
pub trait WorkbookSource: std::fmt::Debug {
    fn sheet_names(&self) -> Vec<String>;

    fn sheet_count(&self) -> usize;

    fn sheet_by_index(&self, index: usize) -> Option<&dyn SheetSource>;

    fn sheet_by_name(&self, name: &str) -> Option<&dyn SheetSource>;

    /// The sheet selected when the caller does not name one
    fn active_sheet(&self) -> Option<&dyn SheetSource> {
        self.sheet_by_index(0)
    }
}

/// Resolve a selector against a workbook, failing with `SheetNotFound`
pub fn resolve_sheet<'a>(
    book: &'a dyn WorkbookSource,
    selector: &SheetSelector,
) -> Result<&'a dyn SheetSource> {
    match selector {
        SheetSelector::Active => book
            .active_sheet()
            .ok_or_else(|| Error::SheetNotFound("<active>".to_string())),
        SheetSelector::Name(name) => book
            .sheet_by_name(name)
            .ok_or_else(|| Error::SheetNotFound(name.clone())),
        SheetSelector::Index(index) => book
            .sheet_by_index(*index)
            .ok_or_else(|| Error::SheetNotFound(format!("#{}", index))),
    }
}

/// An in-memory sheet, for tests and for embedders that already hold their
/// data in row/column form.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    name: String,
    rows: Vec<Vec<RawValue>>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<RawValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Build a sheet where every cell is text
    pub fn from_text_rows(name: impl Into<String>, rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(RawValue::from).collect())
            .collect();
        Self::new(name, rows)
    }

    pub fn push_row(&mut self, row: Vec<RawValue>) {
        self.rows.push(row);
    }
}

impl SheetSource for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    fn cell_value(&self, row: usize, column: usize, prefer_text: bool) -> RawValue {
        let cell = self
            .rows
            .get(row)
            .and_then(|r| r.get(column))
            .cloned()
            .unwrap_or_default();
        if prefer_text {
            RawValue::Text(cell.to_text())
        } else {
            cell
        }
    }
}

/// An in-memory workbook over [`MemorySheet`]s
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
    active: usize,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<MemorySheet>) -> Self {
        Self { sheets, active: 0 }
    }

    /// Wrap a single sheet
    pub fn single(sheet: MemorySheet) -> Self {
        Self::new(vec![sheet])
    }

    pub fn set_active(&mut self, index: usize) {
        self.active = index;
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet_by_index(&self, index: usize) -> Option<&dyn SheetSource> {
        self.sheets.get(index).map(|s| s as &dyn SheetSource)
    }

    fn sheet_by_name(&self, name: &str) -> Option<&dyn SheetSource> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s as &dyn SheetSource)
    }

    fn active_sheet(&self) -> Option<&dyn SheetSource> {
        self.sheets.get(self.active).map(|s| s as &dyn SheetSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sheet_bounds() {
        let sheet = MemorySheet::from_text_rows("s", vec![vec!["a", "b"], vec!["c"]]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.column_count(), 2);
        assert_eq!(sheet.cell_value(1, 1, false), RawValue::Empty);
        assert_eq!(sheet.cell_value(9, 0, false), RawValue::Empty);
    }

    #[test]
    fn test_prefer_text_renders_native_values() {
        let sheet = MemorySheet::new("s", vec![vec![RawValue::Number(1.5)]]);
        assert_eq!(sheet.cell_value(0, 0, true), RawValue::Text("1.5".into()));
        assert_eq!(sheet.cell_value(0, 0, false), RawValue::Number(1.5));
    }

    #[test]
    fn test_resolve_sheet() {
        let book = MemoryWorkbook::new(vec![
            MemorySheet::from_text_rows("first", vec![]),
            MemorySheet::from_text_rows("second", vec![]),
        ]);
        assert_eq!(
            resolve_sheet(&book, &SheetSelector::Active).unwrap().name(),
            "first"
        );
        assert_eq!(
            resolve_sheet(&book, &SheetSelector::Name("second".into()))
                .unwrap()
                .name(),
            "second"
        );
        let err = resolve_sheet(&book, &SheetSelector::Index(5)).unwrap_err();
        assert_eq!(err.kind(), gridport_core::ErrorKind::SheetNotFound);
    }
}
