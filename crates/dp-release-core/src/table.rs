//! In-memory tables
//!
//! A [`Table`] is an ordered set of named [`Column`]s that all share one row
//! count. Row identity is positional. Tables handed to the engine are never
//! mutated; projections and releases are independent copies.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors raised when building or projecting a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A column's length differs from the table's row count
    #[error("column '{column}' has {got} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        got: usize,
    },
    /// Two columns share a name
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    /// A requested column is not part of the table
    #[error("column '{0}' not found")]
    MissingColumn(String),
}

/// A single cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Convenience constructor for text cells
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric payload, if the cell holds a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, if the cell holds text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Create a column from anything convertible to cells
    pub fn new<V: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Column {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every non-null cell holds a number.
    ///
    /// An all-null column counts as numeric, matching dataframe typing
    /// where a column of missing values is a float column.
    pub fn is_numeric(&self) -> bool {
        self.values
            .iter()
            .all(|v| matches!(v, Value::Null | Value::Number(_)))
    }

    /// Replace the cells, keeping the name
    pub fn with_values(&self, values: Vec<Value>) -> Self {
        Column {
            name: self.name.clone(),
            values,
        }
    }
}

/// An ordered collection of equally long columns
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, checking names are unique and lengths agree
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != row_count {
                return Err(TableError::RaggedColumn {
                    column: column.name.clone(),
                    expected: row_count,
                    got: column.len(),
                });
            }
        }

        Ok(Table { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Independent copy restricted to `names`, in the order given
    pub fn select(&self, names: &[&str]) -> Result<Table, TableError> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name)
                    .cloned()
                    .ok_or_else(|| TableError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Table::new(columns)
    }

    /// Iterate row-wise over the cells
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new("Name", ["Asha", "Ravi"]),
            Column::new("Household Size", [3.0, 5.0]),
            Column::new("Email Address", [Some("a@b.in"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::new("A", [1.0, 2.0]),
            Column::new("B", [1.0]),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            TableError::RaggedColumn {
                column: "B".to_string(),
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let err = Table::new(vec![Column::new("A", [1.0]), Column::new("A", [2.0])]).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("A".to_string()));
    }

    #[test]
    fn test_select_is_independent_copy_in_requested_order() {
        let table = sample();
        let projected = table.select(&["Email Address", "Name"]).unwrap();

        assert_eq!(projected.column_names(), vec!["Email Address", "Name"]);
        assert_eq!(projected.row_count(), 2);
        // Source untouched
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_select_missing_column() {
        let err = sample().select(&["Caste"]).unwrap_err();
        assert_eq!(err, TableError::MissingColumn("Caste".to_string()));
    }

    #[test]
    fn test_is_numeric() {
        let table = sample();
        assert!(table.column("Household Size").unwrap().is_numeric());
        assert!(!table.column("Name").unwrap().is_numeric());
        assert!(Column::new("Empty", [Value::Null, Value::Null]).is_numeric());
    }

    #[test]
    fn test_rows() {
        let table = sample();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2], &Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::text("x").to_string(), "x");
    }
}
