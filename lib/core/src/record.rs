use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A loosely typed spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Empty cell or missing column value
    #[default]
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    #[inline]
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Build a cell from a raw CSV field. Empty fields are missing values.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(field.to_string())
        }
    }

    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Render the cell as text. Missing values render as an empty string.
    pub fn as_text(&self) -> String {
        if self.is_missing() {
            return String::new();
        }
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            // integral floats print without the fractional part
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
            Value::String(s) if s.is_empty() => Cell::Missing,
            Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Missing)
    }
}

/// One row of a catalog table, identified by its position in the table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub title: Cell,
    #[serde(default)]
    pub detail: Cell,
    #[serde(default)]
    pub category: Cell,
    #[serde(default)]
    pub price: Cell,
}

impl Record {
    pub fn new(
        title: impl Into<Cell>,
        detail: impl Into<Cell>,
        category: impl Into<Cell>,
        price: impl Into<Cell>,
    ) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            category: category.into(),
            price: price.into(),
        }
    }

    /// A record with only a title and a price, the rest missing
    pub fn titled(title: impl Into<Cell>, price: impl Into<Cell>) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            ..Self::default()
        }
    }
}

/// A named catalog table. Row indices are positions in `records`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Original title text of a row, empty when the row or title is missing
    pub fn title_of(&self, index: usize) -> String {
        self.records
            .get(index)
            .map(|r| r.title.as_text())
            .unwrap_or_default()
    }
}
