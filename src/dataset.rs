//! In-memory tabular data
//!
//! A [`Dataset`] is an ordered set of named columns and an ordered list of
//! rows. Cells are loosely typed [`Value`]s; [`Value::Null`] is the missing
//! marker that the transform stage drops.

use std::fmt;

/// A single cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    /// Missing marker or a NaN float
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Real(x) => x.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
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
        v.map_or(Value::Null, Into::into)
    }
}

/// Storage class of a column, inferred from its non-null values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Boolean,
    Text,
}

impl ColumnType {
    /// SQL type name used when creating a table for this column
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "BIGINT",
            ColumnType::Real => "FLOAT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Text => "TEXT",
        }
    }

    /// Narrowest type that can hold every non-null value in `values`
    ///
    /// Integers widen to reals. Anything else mixed together is text.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut inferred: Option<ColumnType> = None;
        for value in values {
            let current = match value {
                Value::Null => continue,
                Value::Integer(_) => ColumnType::Integer,
                Value::Real(_) => ColumnType::Real,
                Value::Boolean(_) => ColumnType::Boolean,
                Value::Text(_) => return ColumnType::Text,
            };
            inferred = Some(match (inferred, current) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Real)
                | (Some(ColumnType::Real), ColumnType::Integer) => ColumnType::Real,
                _ => return ColumnType::Text,
            });
        }
        inferred.unwrap_or(ColumnType::Text)
    }
}

/// Ordered rows sharing an ordered set of named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from columns and rows
    ///
    /// Short rows are padded with [`Value::Null`] and long rows truncated so
    /// every row has one cell per column.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row);
        }
        dataset
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, fitting it to the column count
    ///
    /// Missing trailing cells become [`Value::Null`]. Cells past the last
    /// column are discarded with a warning; callers that must reject such
    /// rows check the width first, as the CSV reader does.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        if row.len() > self.columns.len() {
            log::warn!(
                "Discarding {} cell(s) beyond the {} column(s) of the dataset",
                row.len() - self.columns.len(),
                self.columns.len()
            );
        }
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Replace every column name through `rename`, keeping order
    pub fn rename_columns<F>(&mut self, rename: F)
    where
        F: FnMut(&str) -> String,
    {
        self.columns = self.columns.iter().map(|c| c.as_str()).map(rename).collect();
    }

    /// Remove every row holding at least one [`Value::Null`]
    ///
    /// Returns the number of rows removed.
    pub fn drop_nulls(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !row.iter().any(Value::is_null));
        before - self.rows.len()
    }

    /// Iterate the cells of column `index` in row order
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Inferred type of every column, in column order
    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.columns.len())
            .map(|i| ColumnType::infer(self.column_values(i)))
            .collect()
    }

    /// Cells of column `name`, if present
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.column_values(index).collect())
    }
}
