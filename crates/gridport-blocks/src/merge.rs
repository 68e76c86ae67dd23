//! Block merging.
//!
//! Recombines a block sequence into one grid. `Append` is a single pass in
//! emission order; the keyed strategies maintain a row-key index and decide
//! per conflict. Cell conversions on the way in are recoverable (logged and
//! nulled); a block of the wrong width is a hard failure.

use std::time::Instant;

use ahash::AHashMap;
use gridport_core::{Error, Grid, ImportLog, Result, Schema, Value};

/// Duplicate-row conflict strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeStrategy {
    /// Every row of every block becomes a new row, in emission order
    #[default]
    Append,
    /// A repeated key replaces the stored row's values in place
    Overwrite,
    /// A repeated key is discarded
    Ignore,
}

/// Options for one merge call
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub strategy: MergeStrategy,
    /// Key column names for duplicate detection; empty means all columns
    pub key_columns: Vec<String>,
}

impl MergeOptions {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            key_columns: Vec::new(),
        }
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// Counters for one merge call; monotonic while the call runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeStatistics {
    pub total_blocks: usize,
    /// Blocks that contributed at least one inserted or replaced row
    pub successful_blocks: usize,
    /// Repeat-key rows seen, counted for every keyed conflict
    pub duplicate_rows: usize,
    /// Cells that failed conversion to their destination type
    pub conversion_failures: usize,
    /// Wall-clock time for the whole merge
    pub elapsed_ms: u64,
}

/// A merged grid plus its diagnostics and counters
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub grid: Grid,
    pub log: ImportLog,
    pub statistics: MergeStatistics,
}

/// What happens to a row whose key is already present.
///
/// Strategies other than `Overwrite`/`Ignore` that reach the keyed path fall
/// back to appending the duplicate as a new row; the engine has always
/// behaved that way and callers rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConflictOutcome {
    Replace,
    Discard,
    AppendDuplicate,
}

fn conflict_outcome(strategy: MergeStrategy) -> ConflictOutcome {
    match strategy {
        MergeStrategy::Overwrite => ConflictOutcome::Replace,
        MergeStrategy::Ignore => ConflictOutcome::Discard,
        _ => ConflictOutcome::AppendDuplicate,
    }
}

/// Merge a block sequence into a single grid.
///
/// The destination schema is the first block's schema; every later block
/// must match its width or the merge fails with `ColumnCountMismatch`.
pub fn merge_blocks(blocks: &[Grid], options: &MergeOptions) -> Result<MergeResult> {
    let started = Instant::now();
    let mut statistics = MergeStatistics {
        total_blocks: blocks.len(),
        ..MergeStatistics::default()
    };
    let mut log = ImportLog::new();

    let schema = blocks
        .first()
        .map(|b| b.schema().clone())
        .unwrap_or_else(Schema::new);
    let mut grid = Grid::new(schema);

    match options.strategy {
        MergeStrategy::Append => {
            for (block_index, block) in blocks.iter().enumerate() {
                check_width(&grid, block, block_index)?;
                let mut contributed = false;
                for (row_index, row) in block.rows().enumerate() {
                    let converted =
                        convert_row(row, grid.schema(), row_index, &mut log, &mut statistics);
                    grid.push_row(converted)?;
                    contributed = true;
                }
                if contributed {
                    statistics.successful_blocks += 1;
                }
            }
        }
        _ => {
            let key_indices = resolve_key_columns(grid.schema(), &options.key_columns)?;
            let mut positions: AHashMap<String, usize> = AHashMap::new();
            for (block_index, block) in blocks.iter().enumerate() {
                check_width(&grid, block, block_index)?;
                let mut contributed = false;
                for (row_index, row) in block.rows().enumerate() {
                    let converted =
                        convert_row(row, grid.schema(), row_index, &mut log, &mut statistics);
                    let key = row_key(&converted, &key_indices);
                    match positions.get(&key) {
                        None => {
                            let position = grid.row_count();
                            grid.push_row(converted)?;
                            positions.insert(key, position);
                            contributed = true;
                        }
                        Some(&position) => {
                            statistics.duplicate_rows += 1;
                            match conflict_outcome(options.strategy) {
                                ConflictOutcome::Replace => {
                                    grid.replace_row(position, converted)?;
                                    log.record(
                                        (position + 1) as i64,
                                        -1,
                                        "",
                                        "duplicate row overwritten",
                                        Some(display_key(&key)),
                                    );
                                    contributed = true;
                                }
                                ConflictOutcome::Discard => {}
                                ConflictOutcome::AppendDuplicate => {
                                    grid.push_row(converted)?;
                                    log.record(
                                        grid.row_count() as i64,
                                        -1,
                                        "",
                                        "duplicate row appended",
                                        Some(display_key(&key)),
                                    );
                                    contributed = true;
                                }
                            }
                        }
                    }
                }
                if contributed {
                    statistics.successful_blocks += 1;
                }
            }
        }
    }

    statistics.elapsed_ms = started.elapsed().as_millis() as u64;
    Ok(MergeResult {
        grid,
        log,
        statistics,
    })
}

fn check_width(grid: &Grid, block: &Grid, block_index: usize) -> Result<()> {
    if block.column_count() != grid.column_count() {
        return Err(Error::ColumnCountMismatch {
            expected: grid.column_count(),
            actual: block.column_count(),
            block: block_index as i64,
        });
    }
    Ok(())
}

fn resolve_key_columns(schema: &Schema, names: &[String]) -> Result<Vec<usize>> {
    if names.is_empty() {
        return Ok((0..schema.len()).collect());
    }
    names
        .iter()
        .map(|name| {
            schema
                .index_of(name)
                .ok_or_else(|| Error::Configuration(format!("unknown key column {:?}", name)))
        })
        .collect()
}

/// Convert one incoming row to the destination column types. Failures are
/// logged, nulled and counted, never fatal.
fn convert_row(
    row: &[Value],
    schema: &Schema,
    row_index: usize,
    log: &mut ImportLog,
    statistics: &mut MergeStatistics,
) -> Vec<Value> {
    row.iter()
        .zip(schema.columns())
        .enumerate()
        .map(|(col, (value, column))| match value.convert_to(column.ty) {
            Some(converted) => converted,
            None => {
                statistics.conversion_failures += 1;
                log.record(
                    (row_index + 1) as i64,
                    (col + 1) as i64,
                    &column.name,
                    format!(
                        "type conversion failed: cannot store {} in {}",
                        value.type_name(),
                        column.ty.name()
                    ),
                    Some(value.to_string()),
                );
                Value::Null
            }
        })
        .collect()
}

const KEY_SEPARATOR: char = '\u{1F}';

/// Canonical row key over the key columns. The unit separator keeps
/// adjacent values from running together.
fn row_key(row: &[Value], key_indices: &[usize]) -> String {
    let mut key = String::new();
    for (i, &index) in key_indices.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        if let Some(value) = row.get(index) {
            key.push_str(&value.to_string());
        }
    }
    key
}

fn display_key(key: &str) -> String {
    key.replace(KEY_SEPARATOR, ", ")
}
