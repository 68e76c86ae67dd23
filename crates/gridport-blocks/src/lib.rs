//! # gridport-blocks
//!
//! Region extraction, block partitioning and block merging over
//! `gridport-core` grids.
//!
//! A partition call slices a grid region into an ordered sequence of
//! standalone blocks; a merge call recombines a block sequence under a
//! conflict strategy. Round trip: any region partitioned with a divisible
//! block size and merged with `Append` reproduces its rows in order, for
//! either traversal.

mod merge;
mod options;
mod partition;
mod region;

pub use merge::{merge_blocks, MergeOptions, MergeResult, MergeStatistics, MergeStrategy};
pub use options::{
    MatrixExportOptions, RemainderAction, RemainderContext, RemainderHandler, RemainderMode,
    Traversal,
};
pub use partition::{cap_block_rows, partition_grid, partition_grid_with};
pub use region::{extract_matrix, resolve_region, Region};
