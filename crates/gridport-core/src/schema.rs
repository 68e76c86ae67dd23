//! Destination schema types

use crate::value::{sheet_epoch, Value};
use rust_decimal::Decimal;

/// Declared type of a destination column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnType {
    /// Accepts any value unchanged (the type of schema-from-header columns)
    Any,
    /// String column
    Text,
    /// Exact decimal column
    Decimal,
    /// 64-bit integer column
    Integer,
    /// Floating-point column
    Float,
    /// Boolean column
    Boolean,
    /// Date/time column
    DateTime,
}

impl ColumnType {
    /// Padding value used when `Fill` remainder handling extends a block
    /// past the region extent.
    pub fn fill_default(&self) -> Value {
        match self {
            ColumnType::Text => Value::Text(String::new()),
            ColumnType::DateTime => Value::DateTime(sheet_epoch()),
            ColumnType::Decimal => Value::Decimal(Decimal::ZERO),
            ColumnType::Integer => Value::Integer(0),
            ColumnType::Float => Value::Float(0.0),
            ColumnType::Any | ColumnType::Boolean => Value::Null,
        }
    }

    /// Get the type name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Any => "any",
            ColumnType::Text => "text",
            ColumnType::Decimal => "decimal",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
        }
    }

    /// Parse a type name as accepted on the CLI
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Some(ColumnType::Any),
            "text" | "string" => Some(ColumnType::Text),
            "decimal" => Some(ColumnType::Decimal),
            "integer" | "int" => Some(ColumnType::Integer),
            "float" | "double" => Some(ColumnType::Float),
            "boolean" | "bool" => Some(ColumnType::Boolean),
            "datetime" | "date" => Some(ColumnType::DateTime),
            _ => None,
        }
    }
}

/// One destination column: name plus declared type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    /// Column name (unique within a schema)
    pub name: String,
    /// Declared type
    pub ty: ColumnType,
}

impl Column {
    /// Create a new column
    pub fn new<S: Into<String>>(name: S, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Create an untyped column
    pub fn any<S: Into<String>>(name: S) -> Self {
        Self::new(name, ColumnType::Any)
    }

    /// Create a text column
    pub fn text<S: Into<String>>(name: S) -> Self {
        Self::new(name, ColumnType::Text)
    }
}

/// Ordered destination schema; column order and names are fixed once built
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema from a column list
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Append a column
    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column by index
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Find a column index by name, case-insensitively
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Check whether a column with this name exists, case-insensitively
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Copy a contiguous column slice into a new schema
    pub fn slice(&self, start: usize, count: usize) -> Schema {
        let end = (start + count).min(self.columns.len());
        Schema {
            columns: self.columns[start.min(self.columns.len())..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_defaults() {
        assert_eq!(ColumnType::Text.fill_default(), Value::Text(String::new()));
        assert_eq!(ColumnType::Integer.fill_default(), Value::Integer(0));
        assert_eq!(ColumnType::Boolean.fill_default(), Value::Null);
        assert_eq!(
            ColumnType::DateTime.fill_default(),
            Value::DateTime(sheet_epoch())
        );
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let schema = Schema::from_columns(vec![
            Column::text("Name"),
            Column::new("Amount", ColumnType::Decimal),
        ]);
        assert_eq!(schema.index_of("name"), Some(0));
        assert_eq!(schema.index_of("AMOUNT"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
    }

    #[test]
    fn test_slice() {
        let schema = Schema::from_columns(vec![
            Column::any("a"),
            Column::any("b"),
            Column::any("c"),
        ]);
        let s = schema.slice(1, 2);
        assert_eq!(s.len(), 2);
        assert_eq!(s.column(0).unwrap().name, "b");

        // Slices clamp to the schema width.
        assert_eq!(schema.slice(2, 10).len(), 1);
    }
}
