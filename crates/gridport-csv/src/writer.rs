//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use gridport_core::Grid;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};

/// Writes grids out as CSV
pub struct CsvWriter;

impl CsvWriter {
    /// Write a grid to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        grid: &Grid,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(grid, file, options)
    }

    /// Write a grid to a writer
    pub fn write<W: Write>(grid: &Grid, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
            LineTerminator::CR => csv::Terminator::Any(b'\r'),
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        if options.write_header {
            csv_writer.write_record(grid.schema().names())?;
        }

        for row in grid.rows() {
            let record: Vec<String> = row.iter().map(|value| value.to_string()).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridport_core::{Column, ColumnType, Schema, Value};
    use pretty_assertions::assert_eq;

    fn sample_grid() -> Grid {
        let schema = Schema::from_columns(vec![
            Column::new("Name", ColumnType::Text),
            Column::new("Amount", ColumnType::Decimal),
        ]);
        let mut grid = Grid::new(schema);
        grid.push_row(vec![
            Value::text("widget"),
            Value::Decimal("12.5".parse().unwrap()),
        ])
        .unwrap();
        grid.push_row(vec![Value::text("gadget"), Value::Null]).unwrap();
        grid
    }

    #[test]
    fn test_write_with_header() {
        let options = CsvWriteOptions {
            line_terminator: LineTerminator::LF,
            ..CsvWriteOptions::default()
        };
        let mut out = Vec::new();
        CsvWriter::write(&sample_grid(), &mut out, &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Name,Amount\nwidget,12.5\ngadget,\n");
    }

    #[test]
    fn test_write_without_header() {
        let options = CsvWriteOptions {
            write_header: false,
            line_terminator: LineTerminator::LF,
            ..CsvWriteOptions::default()
        };
        let mut out = Vec::new();
        CsvWriter::write(&sample_grid(), &mut out, &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "widget,12.5\ngadget,\n");
    }
}
