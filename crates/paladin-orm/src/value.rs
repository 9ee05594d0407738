//! Column values exchanged with the backing store

use crate::errors::Result;
use paladin_core::errors::PaladinError;
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

/// A single column value
///
/// Booleans are stored as integers (`0`/`1`), matching SQLite.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Storage class name, used in conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Integer(i64::from(v))
            }
        })*
    };
}

integer_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<'a> From<ValueRef<'a>> for Value {
    fn from(v: ValueRef<'a>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

/// Conversion from a stored value into a field type
pub trait FromValue: Sized {
    /// # Errors
    ///
    /// Returns a `Serialization` error when the storage class does not fit.
    fn from_value(column: &str, value: &Value) -> Result<Self>;
}

fn mismatch<T>(column: &str, expected: &str, found: &Value) -> Result<T> {
    Err(PaladinError::ColumnType {
        column: column.to_string(),
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
    .into())
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(*i),
            other => mismatch(column, "integer", other),
        }
    }
}

impl FromValue for i32 {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => i32::try_from(*i).or_else(|_| mismatch(column, "i32", value)),
            other => mismatch(column, "integer", other),
        }
    }
}

impl FromValue for u32 {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => u32::try_from(*i).or_else(|_| mismatch(column, "u32", value)),
            other => mismatch(column, "integer", other),
        }
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Real(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            other => mismatch(column, "real", other),
        }
    }
}

impl FromValue for bool {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(*i != 0),
            other => mismatch(column, "boolean", other),
        }
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => mismatch(column, "text", other),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Blob(b) => Ok(b.clone()),
            other => mismatch(column, "blob", other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}
