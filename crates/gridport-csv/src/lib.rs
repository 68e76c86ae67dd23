//! # gridport-csv
//!
//! CSV adapter for gridport: a [`CsvWorkbook`] implementing the import
//! layer's workbook-source interface, and a [`CsvWriter`] for grids.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::{CsvSheet, CsvWorkbook};
pub use writer::CsvWriter;
