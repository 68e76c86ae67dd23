//! Sheet-to-grid import driver.
//!
//! Ties the pieces together: resolve the sheet, run header resolution once,
//! then normalize and coerce every bound cell row by row. Cell problems end
//! up in the log; structural problems abort with a classified error.

use gridport_core::{Error, Grid, ImportLog, Result};

use crate::coerce::Coercer;
use crate::header;
use crate::normalize::ValueNormalizer;
use crate::settings::ImportSettings;
use crate::source::{resolve_sheet, RawValue, SheetSource, WorkbookSource};

/// The outcome of one import: the typed grid plus its diagnostics
#[derive(Debug, Clone)]
pub struct Import {
    pub grid: Grid,
    pub log: ImportLog,
}

/// Reads one sheet into a [`Grid`] under a settings snapshot
#[derive(Debug)]
pub struct GridReader {
    settings: ImportSettings,
}

impl GridReader {
    pub fn new(settings: ImportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Import from a workbook, resolving the configured sheet selector
    pub fn read(&self, book: &dyn WorkbookSource) -> Result<Import> {
        self.settings.validate()?;
        let sheet = resolve_sheet(book, &self.settings.sheet)?;
        self.read_resolved(sheet)
    }

    /// Import directly from a sheet, bypassing selection
    pub fn read_sheet(&self, sheet: &dyn SheetSource) -> Result<Import> {
        self.settings.validate()?;
        self.read_resolved(sheet)
    }

    fn read_resolved(&self, sheet: &dyn SheetSource) -> Result<Import> {
        let rows = sheet.row_count();
        let width = sheet.column_count();
        if rows == 0 || width == 0 {
            return Err(Error::EmptyFile(sheet.name().to_string()));
        }
        if self.settings.has_header && self.settings.header_row >= rows {
            return Err(Error::parse(format!(
                "header row {} is beyond the sheet's {} rows",
                self.settings.header_row, rows
            )));
        }

        // Compile the custom pattern before touching any cell, so a bad
        // pattern fails the read up front.
        let normalizer = ValueNormalizer::from_settings(&self.settings)?;
        let coercer = Coercer::from_settings(&self.settings);

        let mut log = ImportLog::new();
        let header_text: Vec<String> = if self.settings.has_header {
            (0..width)
                .map(|col| match sheet.cell_value(self.settings.header_row, col, true) {
                    RawValue::Text(s) => s,
                    other => other.to_text(),
                })
                .collect()
        } else {
            vec![String::new(); width]
        };
        let resolution = header::resolve(&header_text, &self.settings, &mut log)?;

        let mut grid = Grid::new(resolution.schema.clone());
        let mut raw_cells = Vec::with_capacity(resolution.bindings.len());
        for row_index in self.settings.data_row..rows {
            raw_cells.clear();
            for binding in &resolution.bindings {
                raw_cells.push(sheet.cell_value(row_index, binding.source, false));
            }
            // A row whose bound cells are all blank contributes nothing.
            if raw_cells.iter().all(RawValue::is_blank) {
                continue;
            }

            let mut row = Vec::with_capacity(resolution.bindings.len());
            for (binding, raw) in resolution.bindings.iter().zip(&raw_cells) {
                let column = &resolution.schema.columns()[binding.dest];
                let raw_text = raw.to_text();
                let normalized = normalizer.normalize_raw(raw);
                let coerced = coercer.coerce(
                    normalized,
                    &raw_text,
                    column,
                    (row_index + 1) as i64,
                    (binding.source + 1) as i64,
                    &mut log,
                );
                row.push(coerced);
            }
            grid.push_row(row)?;
        }

        Ok(Import { grid, log })
    }
}
