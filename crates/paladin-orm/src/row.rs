//! Result rows and equality filters

use crate::errors::Result;
use crate::schema::ID_COLUMN;
use crate::value::{FromValue, Value};
use paladin_core::errors::PaladinError;
use std::collections::BTreeMap;

/// One row returned by the backing store, columns in result-set order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    table: String,
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column (builder style)
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((column.into(), value.into()));
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Read a typed column value
    ///
    /// # Errors
    ///
    /// `NotFound` when the column is absent, `Serialization` when the stored
    /// value does not convert to `T`.
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self.value(column).ok_or_else(|| PaladinError::MissingColumn {
            table: self.table.clone(),
            column: column.to_string(),
        })?;
        T::from_value(column, value)
    }

    /// The row identity
    ///
    /// # Errors
    ///
    /// Fails like [`Row::get`] when `id` is absent or not an integer.
    pub fn id(&self) -> Result<i64> {
        self.get(ID_COLUMN)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Equality conditions AND-ed together; empty means "all rows"
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters(BTreeMap<String, Value>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value` (a `Null` value matches `IS NULL`)
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Conditions in column-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
