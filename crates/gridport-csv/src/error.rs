//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] gridport_core::Error),
}

impl From<CsvError> for gridport_core::Error {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::Core(e) => e,
            CsvError::Io(e) => gridport_core::Error::other(format!("IO error: {}", e)),
            CsvError::Csv(e) => gridport_core::Error::parse(format!("CSV error: {}", e)),
        }
    }
}
