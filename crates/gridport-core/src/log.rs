//! Import log: per-cell diagnostics collected during a read.
//!
//! Normalization and coercion never abort an import over a single bad cell;
//! they record what happened here and move on. The log is an owned value
//! carried through the read, not a global sink, so concurrent imports never
//! interleave entries.

use std::fmt;

/// One diagnostic raised while normalizing or coercing a cell.
///
/// Positions are 1-based as a spreadsheet user would read them; `-1` means
/// the entry is not tied to a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub row: i64,
    pub column: i64,
    pub column_name: String,
    pub message: String,
    pub raw_value: Option<String>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}, column {} ({}): {}",
            self.row, self.column, self.column_name, self.message
        )?;
        if let Some(raw) = &self.raw_value {
            write!(f, " [value: {:?}]", raw)?;
        }
        Ok(())
    }
}

/// Ordered collection of [`LogEntry`] values for one import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportLog {
    entries: Vec<LogEntry>,
}

impl ImportLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic tied to a cell
    pub fn record(
        &mut self,
        row: i64,
        column: i64,
        column_name: impl Into<String>,
        message: impl Into<String>,
        raw_value: Option<String>,
    ) {
        self.entries.push(LogEntry {
            row,
            column,
            column_name: column_name.into(),
            message: message.into(),
            raw_value,
        });
    }

    /// Record a diagnostic with no cell position
    pub fn note(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            row: -1,
            column: -1,
            column_name: String::new(),
            message: message.into(),
            raw_value: None,
        });
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Move all entries from another log into this one
    pub fn merge(&mut self, other: ImportLog) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}

impl IntoIterator for ImportLog {
    type Item = LogEntry;
    type IntoIter = std::vec::IntoIter<LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_display() {
        let mut log = ImportLog::new();
        log.record(3, 2, "Amount", "could not convert to Decimal", Some("abc".into()));
        assert_eq!(log.len(), 1);
        let text = log.entries()[0].to_string();
        assert!(text.contains("row 3"));
        assert!(text.contains("Amount"));
        assert!(text.contains("\"abc\""));
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut a = ImportLog::new();
        a.note("first");
        let mut b = ImportLog::new();
        b.note("second");
        a.merge(b);
        let messages: Vec<_> = a.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
