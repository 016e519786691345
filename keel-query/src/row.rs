//! Materialized result rows.

use std::fmt;

use indexmap::IndexMap;
use keel_schema::{FromValue, Value, ValueError};
use serde::{Deserialize, Serialize};

/// Error type for row materialization.
#[derive(Debug, Clone, PartialEq)]
pub enum RowError {
    /// Column not found.
    ColumnNotFound(String),
    /// Type conversion error.
    TypeConversion { column: String, source: ValueError },
    /// The model has no field with this name.
    UnknownField(String),
}

impl RowError {
    /// Attach a column name to a conversion error.
    pub fn conversion(column: impl Into<String>, source: ValueError) -> Self {
        Self::TypeConversion {
            column: column.into(),
            source,
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(col) => write!(f, "column '{}' not found", col),
            Self::TypeConversion { column, source } => {
                write!(f, "type conversion error for '{}': {}", column, source)
            }
            Self::UnknownField(field) => write!(f, "unknown field '{}'", field),
        }
    }
}

impl std::error::Error for RowError {}

/// One result row: an ordered mapping from column name to value.
///
/// Serializes as a map in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Builder-style, mostly for tests and drivers.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Append or replace a column.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Get a raw column value.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Get a column converted to a typed value.
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T, RowError> {
        let value = self
            .columns
            .get(column)
            .ok_or_else(|| RowError::ColumnNotFound(column.to_string()))?;
        T::from_value(value.clone()).map_err(|e| RowError::conversion(column, e))
    }

    /// Value of the first column.
    pub fn first(&self) -> Option<&Value> {
        self.columns.first().map(|(_, v)| v)
    }

    /// Column names in result order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterate over `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_preserves_column_order() {
        let row = Row::new().with("id", 1).with("name", "ann").with("email", "a@x.io");
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name", "email"]);
        assert_eq!(row.first(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_row_typed_get() {
        let row = Row::new().with("id", 7).with("bio", Value::Null);
        assert_eq!(row.get::<i64>("id").unwrap(), 7);
        assert_eq!(row.get::<Option<String>>("bio").unwrap(), None);
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let row = Row::new().with("id", 3).with("name", "ann").with("bio", Value::Null);
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"id":3,"name":"ann","bio":null}"#
        );
    }

    #[test]
    fn test_row_get_errors() {
        let row = Row::new().with("id", "seven");
        assert_eq!(
            row.get::<i64>("missing").unwrap_err(),
            RowError::ColumnNotFound("missing".into())
        );
        let err = row.get::<i64>("id").unwrap_err();
        assert!(err.to_string().contains("'id'"));
    }
}
