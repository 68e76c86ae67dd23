//! Block partitioning.
//!
//! Splits a region into an ordered sequence of standalone rectangular grids.
//! Blocks are emitted column-major or row-major depending on the traversal;
//! consumers that reassemble rows rely on that sequence, so the enumeration
//! order here must not change.

use gridport_core::{Column, Error, Grid, Result, Value, CELL_SIZE_ESTIMATE};

use crate::options::{
    MatrixExportOptions, RemainderAction, RemainderContext, RemainderHandler, RemainderMode,
};
use crate::region::{resolve_region, Region};

/// Cap block rows to the byte budget: `budget / (region columns * 32)`,
/// never below one row. Applied before any remainder math.
pub fn cap_block_rows(block_rows: usize, region_columns: usize, budget: Option<usize>) -> usize {
    match budget {
        Some(bytes) if region_columns > 0 => {
            let cap = (bytes / (region_columns * CELL_SIZE_ESTIMATE)).max(1);
            block_rows.min(cap)
        }
        _ => block_rows,
    }
}

/// Partition a grid region into blocks, without a remainder handler.
///
/// [`RemainderMode::Prompt`] is a configuration failure here; use
/// [`partition_grid_with`] to supply the handler.
pub fn partition_grid(grid: &Grid, options: &MatrixExportOptions) -> Result<Vec<Grid>> {
    partition_grid_with(grid, options, None)
}

/// Partition a grid region into blocks, consulting `handler` when the
/// remainder policy is `Prompt`.
pub fn partition_grid_with(
    grid: &Grid,
    options: &MatrixExportOptions,
    handler: Option<&dyn RemainderHandler>,
) -> Result<Vec<Grid>> {
    let mut region = resolve_region(grid, options)?;
    if region.rows == 0 || region.columns == 0 {
        return Ok(Vec::new());
    }

    let requested_rows = options.block_rows.unwrap_or(region.rows);
    let block_columns = options.block_columns.unwrap_or(region.columns);
    if requested_rows == 0 || block_columns == 0 {
        return Err(Error::Configuration(
            "block sizes must be at least one row and one column".to_string(),
        ));
    }
    let block_rows = cap_block_rows(requested_rows, region.columns, options.max_block_bytes);

    let row_remainder = region.rows % block_rows;
    let column_remainder = region.columns % block_columns;
    let mut fill = false;
    if row_remainder != 0 || column_remainder != 0 {
        let mode = options.remainder.unwrap_or_default();
        let action = match mode {
            RemainderMode::Error => RemainderAction::Abort,
            RemainderMode::Fill => RemainderAction::Fill,
            RemainderMode::Truncate => RemainderAction::Truncate,
            RemainderMode::Prompt => {
                let handler = handler.ok_or_else(|| {
                    Error::Configuration(
                        "remainder mode Prompt requires a registered handler".to_string(),
                    )
                })?;
                handler.decide(&RemainderContext {
                    region_rows: region.rows,
                    region_columns: region.columns,
                    block_rows,
                    block_columns,
                    row_remainder,
                    column_remainder,
                    mode,
                    options,
                })
            }
        };
        match action {
            RemainderAction::Abort => {
                return Err(Error::RemainderNotDivisible {
                    rows: region.rows,
                    columns: region.columns,
                    block_rows,
                    block_columns,
                });
            }
            RemainderAction::Truncate => {
                region.rows -= row_remainder;
                region.columns -= column_remainder;
                if region.rows == 0 || region.columns == 0 {
                    return Ok(Vec::new());
                }
            }
            RemainderAction::Fill => fill = true,
        }
    }

    let row_blocks = block_count(region.rows, block_rows, fill);
    let column_blocks = block_count(region.columns, block_columns, fill);

    let mut blocks = Vec::with_capacity(row_blocks * column_blocks);
    match options.traversal {
        crate::options::Traversal::TopDownLeftRight => {
            for cb in 0..column_blocks {
                for rb in 0..row_blocks {
                    blocks.push(make_block(grid, &region, rb, cb, block_rows, block_columns)?);
                }
            }
        }
        crate::options::Traversal::LeftRightTopDown => {
            for rb in 0..row_blocks {
                for cb in 0..column_blocks {
                    blocks.push(make_block(grid, &region, rb, cb, block_rows, block_columns)?);
                }
            }
        }
    }
    Ok(blocks)
}

fn block_count(extent: usize, block: usize, fill: bool) -> usize {
    if fill {
        (extent + block - 1) / block
    } else {
        extent / block
    }
}

/// Materialize one block as an independent grid. Cells beyond the region's
/// extent (possible only under fill) take the block column's type default.
fn make_block(
    grid: &Grid,
    region: &Region,
    row_block: usize,
    column_block: usize,
    block_rows: usize,
    block_columns: usize,
) -> Result<Grid> {
    let row_offset = row_block * block_rows;
    let column_offset = column_block * block_columns;

    let mut schema = grid
        .schema()
        .slice(region.start_column + column_offset, block_columns);
    while schema.len() < block_columns {
        let absolute = region.start_column + column_offset + schema.len();
        schema.push(Column::any(format!("Column{}", absolute + 1)));
    }

    let mut block = Grid::new(schema);
    for r in 0..block_rows {
        let mut row = Vec::with_capacity(block_columns);
        for c in 0..block_columns {
            let inside = row_offset + r < region.rows && column_offset + c < region.columns;
            let value = if inside {
                grid.value(
                    region.start_row + row_offset + r,
                    region.start_column + column_offset + c,
                )
                .cloned()
                .unwrap_or(Value::Null)
            } else {
                block
                    .schema()
                    .column(c)
                    .map(|col| col.ty.fill_default())
                    .unwrap_or(Value::Null)
            };
            row.push(value);
        }
        block.push_row(row)?;
    }
    Ok(block)
}
