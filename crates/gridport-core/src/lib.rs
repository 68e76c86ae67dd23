//! # gridport-core
//!
//! Core data structures for the gridport import library.
//!
//! This crate provides the fundamental types used throughout gridport:
//! - [`Value`] - Normalized cell values (text, numbers, booleans, date-times)
//! - [`Schema`], [`Column`], [`ColumnType`] - The target shape of an import
//! - [`Grid`] - A rectangular, fully-materialized result set
//! - [`ImportLog`] - Per-cell diagnostics collected during a read
//! - [`Error`], [`ErrorKind`] - The shared error surface
//!
//! ## Example
//!
//! ```rust
//! use gridport_core::{Column, ColumnType, Grid, Schema, Value};
//!
//! let schema = Schema::from_columns(vec![
//!     Column::new("Name", ColumnType::Text),
//!     Column::new("Amount", ColumnType::Decimal),
//! ]);
//!
//! let mut grid = Grid::new(schema);
//! grid.push_row(vec![Value::from("widget"), Value::from(1.25)]).unwrap();
//!
//! assert_eq!(grid.row_count(), 1);
//! assert_eq!(grid.value(0, 0).unwrap().as_str(), Some("widget"));
//! ```

pub mod error;
pub mod grid;
pub mod letters;
pub mod log;
pub mod schema;
pub mod value;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};
pub use grid::Grid;
pub use letters::{index_to_letters, letters_to_index};
pub use log::{ImportLog, LogEntry};
pub use schema::{Column, ColumnType, Schema};
pub use value::{datetime_from_day_count, sheet_epoch, Value};

/// Bytes assumed per cell when sizing partition blocks
pub const CELL_SIZE_ESTIMATE: usize = 32;
