//! Adapter between a query engine's `Queryable`/`Transaction`/`DriverAdapter`
//! contract and a native MySQL client.
//!
//! The adapter classifies wire-level column metadata into portable
//! [`ColumnType`]s, turns driver failures into [`DriverAdapterError`]s, and
//! scopes transactions to a single pooled connection.

pub mod error;
pub mod mysql;
pub mod native;
pub mod observer;
pub mod prelude;
pub mod results;
pub mod traits;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{DriverAdapterError, MySqlAdapterError};
pub use mysql::{MySqlAdapter, MySqlAdapterOptions, MySqlQueryable, MySqlTransaction};
pub use results::ResultSet;
pub use traits::{DriverAdapter, Queryable, Transaction};
pub use types::{ColumnType, ConnectionInfo, Query, RowValues, TransactionOptions};
