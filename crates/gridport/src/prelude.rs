//! Prelude module - common imports for gridport users
//!
//! ```rust
//! use gridport::prelude::*;
//! ```

pub use crate::{
    // Core data model
    Column,
    ColumnType,
    // Error types
    Error,
    ErrorKind,
    Grid,
    // Diagnostics
    ImportLog,
    // Import types
    ImportSettings,
    LogEntry,
    // Partition/merge types
    MatrixExportOptions,
    MergeOptions,
    MergeResult,
    MergeStatistics,
    MergeStrategy,
    RemainderAction,
    RemainderContext,
    RemainderHandler,
    RemainderMode,
    Result,
    Schema,
    SheetSelector,
    Traversal,
    Value,
    // Source traits
    SheetSource,
    WorkbookSource,
    // Reader
    GridReader,
    HeaderMode,
    Import,
    // Grid-level operations
    extract_matrix,
    merge_blocks,
    partition_grid,
    partition_grid_with,
    // File-level entry points
    open_workbook,
    read_blocks,
    read_grid,
    read_matrix,
    read_merged,
};
