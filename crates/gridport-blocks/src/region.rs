//! Region resolution and matrix extraction

use gridport_core::{Error, Grid, Result, Value};

use crate::options::MatrixExportOptions;

/// A resolved rectangular sub-window of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start_row: usize,
    pub start_column: usize,
    pub rows: usize,
    pub columns: usize,
}

/// Resolve the options' start/count fields against a grid's extent.
///
/// Omitted counts default to the full remaining extent. A start beyond the
/// extent or a count overrunning it is a structural failure, not a clamp.
pub fn resolve_region(grid: &Grid, options: &MatrixExportOptions) -> Result<Region> {
    let total_rows = grid.row_count();
    let total_columns = grid.column_count();

    if options.start_row > total_rows || options.start_column > total_columns {
        return Err(Error::parse(format!(
            "region start ({}, {}) is outside the grid extent {}x{}",
            options.start_row, options.start_column, total_rows, total_columns
        )));
    }

    let rows = match options.row_count {
        Some(count) => {
            if options.start_row + count > total_rows {
                return Err(Error::parse(format!(
                    "region rows {}..{} overrun the grid's {} rows",
                    options.start_row,
                    options.start_row + count,
                    total_rows
                )));
            }
            count
        }
        None => total_rows - options.start_row,
    };
    let columns = match options.column_count {
        Some(count) => {
            if options.start_column + count > total_columns {
                return Err(Error::parse(format!(
                    "region columns {}..{} overrun the grid's {} columns",
                    options.start_column,
                    options.start_column + count,
                    total_columns
                )));
            }
            count
        }
        None => total_columns - options.start_column,
    };

    Ok(Region {
        start_row: options.start_row,
        start_column: options.start_column,
        rows,
        columns,
    })
}

/// Slice a region into a row-major matrix of cloned values
pub fn extract_matrix(grid: &Grid, options: &MatrixExportOptions) -> Result<Vec<Vec<Value>>> {
    let region = resolve_region(grid, options)?;
    let mut matrix = Vec::with_capacity(region.rows);
    for r in 0..region.rows {
        let mut row = Vec::with_capacity(region.columns);
        for c in 0..region.columns {
            let value = grid
                .value(region.start_row + r, region.start_column + c)
                .cloned()
                .unwrap_or(Value::Null);
            row.push(value);
        }
        matrix.push(row);
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridport_core::{Column, Schema};
    use pretty_assertions::assert_eq;

    fn grid_3x3() -> Grid {
        let schema = Schema::from_columns(vec![
            Column::any("a"),
            Column::any("b"),
            Column::any("c"),
        ]);
        let mut grid = Grid::new(schema);
        for r in 0..3i64 {
            grid.push_row(vec![
                Value::Integer(r * 3),
                Value::Integer(r * 3 + 1),
                Value::Integer(r * 3 + 2),
            ])
            .unwrap();
        }
        grid
    }

    #[test]
    fn test_full_extent_defaults() {
        let grid = grid_3x3();
        let region = resolve_region(&grid, &MatrixExportOptions::whole()).unwrap();
        assert_eq!(
            region,
            Region {
                start_row: 0,
                start_column: 0,
                rows: 3,
                columns: 3
            }
        );
    }

    #[test]
    fn test_windowed_region() {
        let grid = grid_3x3();
        let options = MatrixExportOptions {
            start_row: 1,
            start_column: 1,
            row_count: Some(2),
            column_count: Some(1),
            ..MatrixExportOptions::default()
        };
        let matrix = extract_matrix(&grid, &options).unwrap();
        assert_eq!(
            matrix,
            vec![vec![Value::Integer(4)], vec![Value::Integer(7)]]
        );
    }

    #[test]
    fn test_overrun_is_structural() {
        let grid = grid_3x3();
        let options = MatrixExportOptions {
            start_row: 1,
            row_count: Some(3),
            ..MatrixExportOptions::default()
        };
        assert!(resolve_region(&grid, &options).is_err());

        let options = MatrixExportOptions {
            start_column: 4,
            ..MatrixExportOptions::default()
        };
        assert!(resolve_region(&grid, &options).is_err());
    }

    #[test]
    fn test_empty_tail_region() {
        let grid = grid_3x3();
        let options = MatrixExportOptions::from(3, 0);
        let region = resolve_region(&grid, &options).unwrap();
        assert_eq!(region.rows, 0);
        assert_eq!(extract_matrix(&grid, &options).unwrap(), Vec::<Vec<Value>>::new());
    }
}
