//! Partition configuration: regions, block sizing, traversal and remainder
//! policy.

/// Block emission order.
///
/// The order is load-bearing: append-merge reconstructs row order purely
/// from the emission sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Traversal {
    /// Column-major: every row-block within a column-block, then the next
    /// column-block
    #[default]
    TopDownLeftRight,
    /// Row-major: every column-block within a row-block, then the next
    /// row-block
    LeftRightTopDown,
}

/// What to do when a region does not divide evenly into blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemainderMode {
    /// Fail the partition with `BlockRemainderNotDivisible`
    #[default]
    Error,
    /// Pad incomplete edge blocks with type-appropriate defaults
    Fill,
    /// Drop the trailing remainder rows/columns before partitioning
    Truncate,
    /// Ask the injected [`RemainderHandler`]
    Prompt,
}

/// A remainder handler's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainderAction {
    Abort,
    Truncate,
    Fill,
}

/// Read-only snapshot handed to a remainder handler under
/// [`RemainderMode::Prompt`]
#[derive(Debug)]
pub struct RemainderContext<'a> {
    pub region_rows: usize,
    pub region_columns: usize,
    pub block_rows: usize,
    pub block_columns: usize,
    pub row_remainder: usize,
    pub column_remainder: usize,
    pub mode: RemainderMode,
    pub options: &'a MatrixExportOptions,
}

/// Decides what happens to a non-divisible region.
///
/// Injected per call; the partitioner holds no process-wide handler state.
pub trait RemainderHandler {
    fn decide(&self, context: &RemainderContext<'_>) -> RemainderAction;
}

impl<F> RemainderHandler for F
where
    F: Fn(&RemainderContext<'_>) -> RemainderAction,
{
    fn decide(&self, context: &RemainderContext<'_>) -> RemainderAction {
        self(context)
    }
}

/// Region, block-size and traversal configuration for one partition call
#[derive(Debug, Clone, Default)]
pub struct MatrixExportOptions {
    /// 0-based first region row in the grid
    pub start_row: usize,
    /// 0-based first region column in the grid
    pub start_column: usize,
    /// Region height; `None` extends to the grid's last row
    pub row_count: Option<usize>,
    /// Region width; `None` extends to the grid's last column
    pub column_count: Option<usize>,
    /// Rows per block; `None` spans all region rows
    pub block_rows: Option<usize>,
    /// Columns per block; `None` spans all region columns
    pub block_columns: Option<usize>,
    /// Remainder policy; `None` resolves to [`RemainderMode::Error`]
    pub remainder: Option<RemainderMode>,
    pub traversal: Traversal,
    /// Caps block rows at `budget / (region columns * 32)`, minimum one row
    pub max_block_bytes: Option<usize>,
}

impl MatrixExportOptions {
    /// The whole grid as one region
    pub fn whole() -> Self {
        Self::default()
    }

    /// A region starting at `(start_row, start_column)` spanning the rest of
    /// the grid
    pub fn from(start_row: usize, start_column: usize) -> Self {
        Self {
            start_row,
            start_column,
            ..Self::default()
        }
    }

    /// Set the block size in one call
    pub fn with_blocks(mut self, rows: usize, columns: usize) -> Self {
        self.block_rows = Some(rows);
        self.block_columns = Some(columns);
        self
    }
}
