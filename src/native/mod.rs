//! Capability the adapter consumes from the native MySQL client.
//!
//! A client only has to run SQL with positional parameters and report either
//! rows plus column metadata, or a result header. Pools additionally hand out
//! connections that go back to the pool on [`NativeConnection::release`].
//!
//! [`ConnectionPool`] (a `bb8` pool) and its pooled connections implement
//! these traits for any manager whose connection type implements
//! [`NativeQueryable`].

mod pool;

pub use pool::ConnectionPool;

use std::future::Future;

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::types::RowValues;

/// How the client should decode one column of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDecoding {
    /// Return the value exactly as the server sent it, as `RowValues::Text`.
    Text,
    /// Let the client pick its usual representation.
    Default,
}

/// Per-field decoding hook consulted by the client for every column.
pub type TypeCast = fn(&FieldPacket) -> FieldDecoding;

/// Arguments for one native call.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions<'a> {
    pub sql: &'a str,
    pub values: &'a [RowValues],
    /// Rows come back as positional arrays rather than keyed objects.
    pub rows_as_array: bool,
    pub type_cast: Option<TypeCast>,
}

impl<'a> QueryOptions<'a> {
    #[must_use]
    pub fn new(sql: &'a str, values: &'a [RowValues]) -> Self {
        Self {
            sql,
            values,
            rows_as_array: false,
            type_cast: None,
        }
    }

    /// Decoding the client should apply to `field`.
    #[must_use]
    pub fn decoding_for(&self, field: &FieldPacket) -> FieldDecoding {
        self.type_cast
            .map_or(FieldDecoding::Default, |type_cast| type_cast(field))
    }
}

/// Column definition as sent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPacket {
    pub name: String,
    pub table: String,
    pub schema: String,
    /// Wire type code, see [`crate::mysql::MySqlType`].
    pub column_type: u8,
    /// Bitmask of [`crate::mysql::ColumnFlags`].
    pub flags: u16,
    pub character_set: u16,
    /// Declared display length.
    pub column_length: u32,
    pub decimals: u8,
}

/// Header returned for statements that do not produce rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSetHeader {
    pub affected_rows: u64,
    pub insert_id: Option<u64>,
    pub changed_rows: u64,
    pub warning_status: u16,
    pub server_status: u16,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NativeData {
    Rows(Vec<Vec<RowValues>>),
    Header(ResultSetHeader),
}

/// Result data plus the column metadata that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeOutput {
    pub data: NativeData,
    pub fields: Vec<FieldPacket>,
}

impl NativeOutput {
    #[must_use]
    pub fn rows(fields: Vec<FieldPacket>, rows: Vec<Vec<RowValues>>) -> Self {
        Self {
            data: NativeData::Rows(rows),
            fields,
        }
    }

    #[must_use]
    pub fn header(header: ResultSetHeader) -> Self {
        Self {
            data: NativeData::Header(header),
            fields: Vec::new(),
        }
    }
}

/// Error packet reported by the server (or synthesized by the client for a query failure).
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{message}")]
pub struct ServerError {
    /// Symbolic code, e.g. `ER_DUP_ENTRY`.
    pub code: Option<String>,
    pub errno: u16,
    pub message: String,
    /// SQLSTATE.
    pub state: String,
    /// Any further fields the client attaches (`fatal`, `sql`, ...).
    pub fields: Map<String, JsonValue>,
}

#[derive(Debug, Error)]
pub enum NativeError {
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Client-side faults that are not about the query (I/O, pool timeouts, bugs).
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl NativeError {
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(err.into())
    }
}

/// Anything that can run SQL: a pool or a single connection.
pub trait NativeQueryable: Send + Sync {
    fn query(
        &self,
        options: QueryOptions<'_>,
    ) -> impl Future<Output = Result<NativeOutput, NativeError>> + Send;
}

/// A connection checked out of a pool.
pub trait NativeConnection: NativeQueryable + 'static {
    /// Hand the connection back to its pool.
    fn release(self);
}

/// Shared pool of native connections.
pub trait NativePool: NativeQueryable {
    type Connection: NativeConnection;

    /// Check a connection out, waiting for capacity if needed.
    fn get_connection(
        &self,
    ) -> impl Future<Output = Result<Self::Connection, NativeError>> + Send;
}
