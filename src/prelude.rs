//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and traits
//! to make it easier to get started with the library.

pub use crate::error::{DriverAdapterError, MySqlAdapterError};
pub use crate::mysql::{MySqlAdapter, MySqlAdapterOptions, MySqlQueryable, MySqlTransaction};
pub use crate::native::{ConnectionPool, NativeConnection, NativePool, NativeQueryable};
pub use crate::observer::{QueryObserver, TracingObserver};
pub use crate::results::ResultSet;
pub use crate::traits::{DriverAdapter, Queryable, Transaction};
pub use crate::types::{ColumnType, ConnectionInfo, Query, RowValues, TransactionOptions};
