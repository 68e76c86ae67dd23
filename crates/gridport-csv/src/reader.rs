//! CSV reader: exposes a CSV file as a single-sheet workbook source.
//!
//! Every cell surfaces as raw text; typing is the import layer's concern,
//! so header and type options live in `ImportSettings`, not here.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use gridport_import::{RawValue, SheetSource, WorkbookSource};

use crate::error::CsvResult;
use crate::options::CsvReadOptions;

/// A parsed CSV file behaving as a one-sheet workbook
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    sheet: CsvSheet,
}

/// The single sheet of a [`CsvWorkbook`]
#[derive(Debug, Clone)]
pub struct CsvSheet {
    name: String,
    rows: Vec<Vec<String>>,
}

impl CsvWorkbook {
    /// Read a CSV file with default options. The sheet is named after the
    /// file stem.
    pub fn open<P: AsRef<Path>>(path: P) -> CsvResult<Self> {
        Self::open_with(path, &CsvReadOptions::default())
    }

    /// Read a CSV file with explicit options
    pub fn open_with<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Self> {
        let name = path
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();
        let file = File::open(path)?;
        Self::from_reader(file, name, options)
    }

    /// Read CSV from any reader
    pub fn from_reader<R: Read>(
        reader: R,
        sheet_name: impl Into<String>,
        options: &CsvReadOptions,
    ) -> CsvResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(options.flexible)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self {
            sheet: CsvSheet {
                name: sheet_name.into(),
                rows,
            },
        })
    }

    pub fn sheet(&self) -> &CsvSheet {
        &self.sheet
    }
}

impl SheetSource for CsvSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    fn cell_value(&self, row: usize, column: usize, _prefer_text: bool) -> RawValue {
        match self.rows.get(row).and_then(|r| r.get(column)) {
            Some(text) if !text.is_empty() => RawValue::Text(text.clone()),
            _ => RawValue::Empty,
        }
    }
}

impl WorkbookSource for CsvWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet.name.clone()]
    }

    fn sheet_count(&self) -> usize {
        1
    }

    fn sheet_by_index(&self, index: usize) -> Option<&dyn SheetSource> {
        (index == 0).then_some(&self.sheet as &dyn SheetSource)
    }

    fn sheet_by_name(&self, name: &str) -> Option<&dyn SheetSource> {
        (self.sheet.name == name).then_some(&self.sheet as &dyn SheetSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_basic() {
        let data = "Name,Amount\nwidget,12.5\ngadget,3\n";
        let book =
            CsvWorkbook::from_reader(data.as_bytes(), "test", &CsvReadOptions::default()).unwrap();
        let sheet = book.sheet();
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.column_count(), 2);
        assert_eq!(sheet.cell_value(0, 0, true), RawValue::Text("Name".into()));
        assert_eq!(sheet.cell_value(2, 1, false), RawValue::Text("3".into()));
    }

    #[test]
    fn test_ragged_rows_and_blanks() {
        let data = "a,b,c\nx\n,,\n";
        let book =
            CsvWorkbook::from_reader(data.as_bytes(), "test", &CsvReadOptions::default()).unwrap();
        let sheet = book.sheet();
        assert_eq!(sheet.column_count(), 3);
        // Missing trailing fields and empty fields both read as Empty.
        assert_eq!(sheet.cell_value(1, 1, false), RawValue::Empty);
        assert_eq!(sheet.cell_value(2, 0, false), RawValue::Empty);
    }

    #[test]
    fn test_custom_delimiter() {
        let data = "a;b\n1;2\n";
        let options = CsvReadOptions {
            delimiter: b';',
            ..CsvReadOptions::default()
        };
        let book = CsvWorkbook::from_reader(data.as_bytes(), "t", &options).unwrap();
        assert_eq!(book.sheet().column_count(), 2);
    }

    #[test]
    fn test_workbook_surface() {
        let data = "a\n";
        let book =
            CsvWorkbook::from_reader(data.as_bytes(), "orders", &CsvReadOptions::default())
                .unwrap();
        assert_eq!(book.sheet_names(), vec!["orders"]);
        assert!(book.sheet_by_name("orders").is_some());
        assert!(book.sheet_by_name("other").is_none());
        assert!(book.sheet_by_index(0).is_some());
        assert!(book.sheet_by_index(1).is_none());
    }
}
