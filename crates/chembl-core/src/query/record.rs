//! Rows returned by the query service
//!
//! A `Record` is one row with named columns, in select order. Mappers read
//! columns by name so that fixed column lists can drive attribute building.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::{Error, Result};

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text rendering used for attribute values
    ///
    /// Reals always keep a fractional digit (`4.0`, not `4`).
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Integer(i) => Some(i.to_string()),
            Self::Real(r) if r.is_finite() && r.fract() == 0.0 => Some(format!("{:.1}", r)),
            Self::Real(r) => Some(r.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }

    /// Numeric view of the value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }

    /// JSON form, keeping numbers numeric
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Real(r) => serde_json::Value::from(*r),
            Self::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

static NULL: Value = Value::Null;

/// One row with named columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    columns: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column (builder style); an existing column keeps its position
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(column, _)| *column == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name, value)),
        }
        self
    }

    /// Column value; columns the row does not carry read as null
    pub fn get(&self, name: &str) -> &Value {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
            .unwrap_or(&NULL)
    }

    /// Text column, rendering numbers when needed
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).render()
    }

    /// Integer column
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Value::Integer(i) => Some(*i),
            Value::Real(r) if r.fract() == 0.0 => Some(*r as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Convert a SQLite row, keeping each value's storage class
    pub fn from_sqlite_row(row: &SqliteRow) -> Result<Self> {
        let mut columns = Vec::with_capacity(row.columns().len());
        for (index, column) in row.columns().iter().enumerate() {
            let raw = row.try_get_raw(index)?;
            let value = if raw.is_null() {
                Value::Null
            } else {
                let type_name = raw.type_info().name().to_string();
                match type_name.as_str() {
                    "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get_unchecked::<i64, _>(index)?),
                    "REAL" | "NUMERIC" => Value::Real(row.try_get_unchecked::<f64, _>(index)?),
                    "TEXT" | "DATE" | "TIME" | "DATETIME" => {
                        Value::Text(row.try_get_unchecked::<String, _>(index)?)
                    }
                    other => {
                        return Err(Error::UnsupportedColumn(
                            column.name().to_string(),
                            other.to_string(),
                        ));
                    }
                }
            };
            columns.push((column.name().to_string(), value));
        }
        Ok(Self { columns })
    }
}
