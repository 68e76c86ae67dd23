//! Error types for gridport-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Classification tag carried by every externally visible failure.
///
/// Callers that do not want to match on individual [`Error`] variants can
/// branch on [`Error::kind`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Unclassified failure
    Unknown,
    /// Source file does not exist
    FileNotFound,
    /// Source file has an unrecognized format
    UnsupportedFormat,
    /// Header/cell/structure parsing failed
    ParseFailed,
    /// Requested sheet does not exist in the workbook
    SheetNotFound,
    /// File or sheet contains no data to import
    EmptyFile,
    /// Source file is password protected
    PasswordProtected,
    /// File could not be opened for shared read
    FileLocked,
    /// Region extent is not evenly divisible by the block size
    BlockRemainderNotDivisible,
}

/// Errors that can occur while importing, partitioning, or merging grids
#[derive(Debug, Error)]
pub enum Error {
    /// Source file does not exist
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was requested
        path: String,
    },

    /// Source file extension/content is not recognized
    #[error("unsupported file format: {path}")]
    UnsupportedFormat {
        /// Path that was requested
        path: String,
    },

    /// File could not be opened for shared read within the retry budget
    #[error("file locked after {attempts} attempt(s): {path}")]
    FileLocked {
        /// Path that was requested
        path: String,
        /// Number of open attempts made before giving up
        attempts: u32,
    },

    /// Source file is password protected
    #[error("file is password protected: {path}")]
    PasswordProtected {
        /// Path that was requested
        path: String,
    },

    /// Requested sheet is missing from the workbook
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// Sheet or header row has no data
    #[error("nothing to import: {0}")]
    EmptyFile(String),

    /// Structural parse failure with cell-level context.
    ///
    /// `row`/`column` are −1 when the failure is not tied to a cell.
    #[error("parse failed at row {row}, column {column}: {message}")]
    ParseFailed {
        /// Row index, −1 when not applicable
        row: i64,
        /// Column index, −1 when not applicable
        column: i64,
        /// Snapshot of the offending value, when one exists
        value: Option<String>,
        /// Human-readable description
        message: String,
    },

    /// A block row's width does not match the destination column count.
    ///
    /// `block` is −1 when the mismatch is not attributable to a block.
    #[error("column count mismatch: expected {expected} columns, got {actual} (block {block})")]
    ColumnCountMismatch {
        /// Expected destination column count
        expected: usize,
        /// Actual row width
        actual: usize,
        /// Emission ordinal of the offending block, −1 when not applicable
        block: i64,
    },

    /// Region extent is not evenly divisible by the block size
    #[error(
        "block remainder not divisible: {rows}x{columns} region with {block_rows}x{block_columns} blocks"
    )]
    RemainderNotDivisible {
        /// Region row count
        rows: usize,
        /// Region column count
        columns: usize,
        /// Configured block row size
        block_rows: usize,
        /// Configured block column size
        block_columns: usize,
    },

    /// Invalid settings/options combination
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The caller cancelled the operation between retry attempts
    #[error("operation cancelled")]
    Cancelled,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a parse failure not tied to a specific cell
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::ParseFailed {
            row: -1,
            column: -1,
            value: None,
            message: msg.into(),
        }
    }

    /// Create a parse failure with cell context and a value snapshot
    pub fn parse_at<S: Into<String>, V: Into<String>>(
        row: i64,
        column: i64,
        value: V,
        msg: S,
    ) -> Self {
        Error::ParseFailed {
            row,
            column,
            value: Some(value.into()),
            message: msg.into(),
        }
    }

    /// Classification tag for this failure.
    ///
    /// [`Error::Cancelled`] reports [`ErrorKind::Unknown`]; cancellation is a
    /// distinct outcome checked via [`Error::is_cancelled`], not a structural
    /// failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound { .. } => ErrorKind::FileNotFound,
            Error::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Error::FileLocked { .. } => ErrorKind::FileLocked,
            Error::PasswordProtected { .. } => ErrorKind::PasswordProtected,
            Error::SheetNotFound(_) => ErrorKind::SheetNotFound,
            Error::EmptyFile(_) => ErrorKind::EmptyFile,
            Error::ParseFailed { .. } => ErrorKind::ParseFailed,
            Error::ColumnCountMismatch { .. } => ErrorKind::ParseFailed,
            Error::RemainderNotDivisible { .. } => ErrorKind::BlockRemainderNotDivisible,
            Error::Configuration(_) => ErrorKind::Unknown,
            Error::Cancelled => ErrorKind::Unknown,
            Error::Other(_) => ErrorKind::Unknown,
        }
    }

    /// (row, column) context for this failure, (−1, −1) when not applicable
    pub fn position(&self) -> (i64, i64) {
        match self {
            Error::ParseFailed { row, column, .. } => (*row, *column),
            _ => (-1, -1),
        }
    }

    /// Snapshot of the offending value, when one was captured
    pub fn value_snapshot(&self) -> Option<&str> {
        match self {
            Error::ParseFailed { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    /// Whether this is the distinct cancellation outcome
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = Error::FileNotFound {
            path: "a.csv".into(),
        };
        assert_eq!(err.kind(), ErrorKind::FileNotFound);

        let err = Error::RemainderNotDivisible {
            rows: 8,
            columns: 2,
            block_rows: 3,
            block_columns: 2,
        };
        assert_eq!(err.kind(), ErrorKind::BlockRemainderNotDivisible);

        assert_eq!(Error::Cancelled.kind(), ErrorKind::Unknown);
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::other("boom").is_cancelled());
    }

    #[test]
    fn test_parse_context() {
        let err = Error::parse_at(4, 2, "(abc)", "not a number");
        assert_eq!(err.position(), (4, 2));
        assert_eq!(err.value_snapshot(), Some("(abc)"));

        let err = Error::parse("header missing");
        assert_eq!(err.position(), (-1, -1));
        assert_eq!(err.value_snapshot(), None);
    }
}
