///
/// Decoded column values.
///
/// A `Value` carries one column of one row, tagged with the storage type the
/// engine reported when it was extracted. `ColumnType` is the closed set of
/// those tags; every decode path matches on it exhaustively.
///

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer32,
    Integer64,
    Float,
    Text,
    Blob,
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer32(i32),
    Integer64(i64),
    Float64(f64),
    Text(String),
    Blob(Vec<u8>),
    Null,
}

/// One value per selected column, in column order.
pub type Row = Vec<Value>;

/// Rows in the order the engine produced them.
pub type RowSet = Vec<Row>;

/// Successive reads of column 0.
pub type ValueColumn = Vec<Value>;

impl Value {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Integer32(_) => ColumnType::Integer32,
            Value::Integer64(_) => ColumnType::Integer64,
            Value::Float64(_) => ColumnType::Float,
            Value::Text(_) => ColumnType::Text,
            Value::Blob(_) => ColumnType::Blob,
            Value::Null => ColumnType::Null,
        }
    }

    /// The fallback used when a typed read comes back empty. `Null` stays `Null`.
    pub fn zero(ty: ColumnType) -> Value {
        match ty {
            ColumnType::Integer32 => Value::Integer32(0),
            ColumnType::Integer64 => Value::Integer64(0),
            ColumnType::Float => Value::Float64(0.0),
            ColumnType::Text => Value::Text(String::new()),
            ColumnType::Blob => Value::Blob(Vec::new()),
            ColumnType::Null => Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer32(v) => Some(i64::from(*v)),
            Value::Integer64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            Value::Integer32(v) => Some(f64::from(*v)),
            Value::Integer64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer32(v) => write!(f, "{}", v),
            Value::Integer64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Blob(bytes) => {
                f.write_str("x'")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                f.write_str("'")
            }
            Value::Null => f.write_str("NULL"),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
