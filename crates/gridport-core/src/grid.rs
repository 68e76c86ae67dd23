//! The imported grid: ordered rows over a fixed schema

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::value::Value;

/// A typed, rectangular result set.
///
/// Rows are dense: every stored row holds exactly one [`Value`] per schema
/// column (possibly [`Value::Null`]). Partial rows are rejected at the
/// boundary, so a `Grid` never exposes a half-materialized row.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl Grid {
    /// Create an empty grid over a schema
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// The grid's schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Check if the grid holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a fully materialized row.
    ///
    /// Fails when the row width does not match the column count; the grid is
    /// left unchanged in that case.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(Error::ColumnCountMismatch {
                expected: self.schema.len(),
                actual: row.len(),
                block: -1,
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Replace an existing row's values in place
    pub fn replace_row(&mut self, index: usize, row: Vec<Value>) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(Error::ColumnCountMismatch {
                expected: self.schema.len(),
                actual: row.len(),
                block: -1,
            });
        }
        match self.rows.get_mut(index) {
            Some(slot) => {
                *slot = row;
                Ok(())
            }
            None => Err(Error::other(format!(
                "row index {} out of bounds (rows: {})",
                index,
                self.rows.len()
            ))),
        }
    }

    /// Get a cell value
    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Get a row as a slice
    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Consume the grid, yielding its rows
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }
}
