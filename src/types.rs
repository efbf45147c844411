use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values that can be bound as query parameters or returned in a result row.
///
/// The same enum is used in both directions so callers never touch driver types:
/// ```rust
/// use mysql_driver_adapter::prelude::*;
///
/// let query = Query::new(
///     "INSERT INTO users (id, name, active) VALUES (?, ?, ?)",
///     vec![
///         RowValues::Int(1),
///         RowValues::Text("alice".into()),
///         RowValues::Bool(true),
///     ],
/// );
/// # let _ = query;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// A SQL statement plus its positional (`?`) bind parameters.
///
/// Produced by the caller and never mutated by the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub sql: String,
    pub args: Vec<RowValues>,
}

impl Query {
    #[must_use]
    pub fn new(sql: impl Into<String>, args: Vec<RowValues>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// A statement without bind parameters.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Database-agnostic category of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Float,
    Double,
    Int32,
    Int64,
    DateTime,
    Time,
    Date,
    Text,
    Bytes,
    Boolean,
    Json,
    Enum,
}

/// Static connection facts exposed to the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
}

/// Options fixed at transaction start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOptions {
    /// When set, the consumer would be expected to emit a marker `BEGIN` query itself.
    pub use_phantom_query: bool,
}
