//! # gridport
//!
//! A Rust library for importing tabular data into typed, in-memory grids and
//! partitioning/merging those grids into rectangular blocks.
//!
//! Gridport reads through a source interface (CSV ships in the box; any
//! row/column reader can implement it), resolving headers, normalizing cell
//! text and coercing values to a destination schema. The resulting grid can
//! be sliced into a region, split into blocks under a traversal order and
//! remainder policy, and merged back under a duplicate-conflict strategy.
//!
//! ## Features
//!
//! - Five header-resolution strategies (window, index list, start index,
//!   by-name, dispersed maps)
//! - Negative-number conventions: leading minus, `(...)` brackets, custom
//!   regex patterns
//! - `YYYYMMDD` numeric-as-date detection with per-cell diagnostics
//! - Block partitioning with `Error`/`Fill`/`Truncate`/`Prompt` remainder
//!   policies and two traversal orders
//! - Append/overwrite/ignore block merging with per-call statistics
//! - Lock-contention retry when opening source files
//!
//! ## Example
//!
//! ```rust
//! use gridport::prelude::*;
//! use gridport::{MemorySheet, MemoryWorkbook};
//!
//! let book = MemoryWorkbook::single(MemorySheet::from_text_rows(
//!     "orders",
//!     vec![
//!         vec!["Name", "Amount"],
//!         vec!["widget", "12.5"],
//!         vec!["gadget", "-3"],
//!     ],
//! ));
//!
//! let import = GridReader::new(ImportSettings::default())
//!     .read(&book)
//!     .unwrap();
//! assert_eq!(import.grid.row_count(), 2);
//!
//! let blocks = partition_grid(
//!     &import.grid,
//!     &MatrixExportOptions::whole().with_blocks(1, 2),
//! )
//! .unwrap();
//! let merged = merge_blocks(&blocks, &MergeOptions::default()).unwrap();
//! assert_eq!(merged.grid, import.grid);
//! ```

pub mod prelude;

// Re-export core types
pub use gridport_core::{
    datetime_from_day_count, index_to_letters, letters_to_index, sheet_epoch, Column, ColumnType,
    Error, ErrorKind, Grid, ImportLog, LogEntry, Result, Schema, Value,
};

// Re-export import types
pub use gridport_import::{
    is_lock_contention, next_step, resolve_header, resolve_sheet, CancelToken, Coercer, ColumnBinding,
    ColumnStart, FileOpener, GridReader, HeaderMode, HeaderResolution, Import, ImportSettings,
    MemorySheet, MemoryWorkbook, RawValue, RetryPolicy, RetryStep, SheetSelector, SheetSource,
    ValueNormalizer, WorkbookSource,
};

// Re-export partition/merge types
pub use gridport_blocks::{
    extract_matrix, merge_blocks, partition_grid, partition_grid_with, resolve_region,
    MatrixExportOptions, MergeOptions, MergeResult, MergeStatistics, MergeStrategy, Region,
    RemainderAction, RemainderContext, RemainderHandler, RemainderMode, Traversal,
};

// Re-export the CSV adapter
pub use gridport_csv::{
    CsvError, CsvReadOptions, CsvSheet, CsvWorkbook, CsvWriteOptions, CsvWriter, LineTerminator,
};

use std::path::Path;

/// Open a source file as a workbook, dispatching on the file extension.
///
/// The file is opened through the default [`FileOpener`], so lock contention
/// is retried before this returns [`ErrorKind::FileLocked`]. Unrecognized
/// extensions fail with [`ErrorKind::UnsupportedFormat`].
pub fn open_workbook<P: AsRef<Path>>(path: P) -> Result<Box<dyn WorkbookSource>> {
    open_workbook_with(path, &FileOpener::default())
}

/// Open a source file as a workbook using an explicit [`FileOpener`]
pub fn open_workbook_with<P: AsRef<Path>>(
    path: P,
    opener: &FileOpener,
) -> Result<Box<dyn WorkbookSource>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    let sheet_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();

    match extension.as_deref() {
        Some("csv") => {
            let file = opener.open(path)?;
            let book = CsvWorkbook::from_reader(file, sheet_name, &CsvReadOptions::default())
                .map_err(Error::from)?;
            Ok(Box::new(book))
        }
        Some("tsv") => {
            let file = opener.open(path)?;
            let options = CsvReadOptions {
                delimiter: b'\t',
                ..CsvReadOptions::default()
            };
            let book =
                CsvWorkbook::from_reader(file, sheet_name, &options).map_err(Error::from)?;
            Ok(Box::new(book))
        }
        _ => Err(Error::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Import a file into a typed grid
pub fn read_grid<P: AsRef<Path>>(path: P, settings: &ImportSettings) -> Result<Import> {
    let book = open_workbook(path)?;
    GridReader::new(settings.clone()).read(book.as_ref())
}

/// Import a file and slice a region of it into a row-major matrix
pub fn read_matrix<P: AsRef<Path>>(
    path: P,
    settings: &ImportSettings,
    options: &MatrixExportOptions,
) -> Result<(Vec<Vec<Value>>, ImportLog)> {
    let import = read_grid(path, settings)?;
    let matrix = extract_matrix(&import.grid, options)?;
    Ok((matrix, import.log))
}

/// Import a file and partition a region of it into blocks
pub fn read_blocks<P: AsRef<Path>>(
    path: P,
    settings: &ImportSettings,
    options: &MatrixExportOptions,
) -> Result<(Vec<Grid>, ImportLog)> {
    let import = read_grid(path, settings)?;
    let blocks = partition_grid(&import.grid, options)?;
    Ok((blocks, import.log))
}

/// Import a file, partition a region of it, and merge the blocks back.
///
/// The result's log holds the import diagnostics followed by the merge
/// diagnostics, in order.
pub fn read_merged<P: AsRef<Path>>(
    path: P,
    settings: &ImportSettings,
    options: &MatrixExportOptions,
    merge_options: &MergeOptions,
) -> Result<MergeResult> {
    let import = read_grid(path, settings)?;
    let blocks = partition_grid(&import.grid, options)?;
    let mut result = merge_blocks(&blocks, merge_options)?;

    let mut log = import.log;
    log.merge(std::mem::take(&mut result.log));
    result.log = log;
    Ok(result)
}
