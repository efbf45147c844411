//! Contract exposed to the query engine.

use async_trait::async_trait;

use crate::error::MySqlAdapterError;
use crate::results::ResultSet;
use crate::types::{ConnectionInfo, Query, TransactionOptions};

/// Adapter name reported by every role.
pub const ADAPTER_NAME: &str = "mysql-driver-adapter";

/// Run SQL against a pool or a connection.
#[async_trait]
pub trait Queryable: Send + Sync {
    fn provider(&self) -> &'static str {
        "mysql"
    }

    fn adapter_name(&self) -> &'static str {
        ADAPTER_NAME
    }

    /// Run a query and return its rows with portable column types.
    async fn query_raw(&self, query: &Query) -> Result<ResultSet, MySqlAdapterError>;

    /// Run a statement and return the affected row count.
    ///
    /// The count crosses this boundary as a `u32`; larger counts are clamped.
    async fn execute_raw(&self, query: &Query) -> Result<u32, MySqlAdapterError>;
}

#[async_trait]
pub trait Transaction: Queryable {
    fn options(&self) -> &TransactionOptions;

    async fn commit(&self) -> Result<(), MySqlAdapterError>;

    async fn rollback(&self) -> Result<(), MySqlAdapterError>;
}

#[async_trait]
pub trait DriverAdapter: Queryable {
    fn connection_info(&self) -> Result<ConnectionInfo, MySqlAdapterError>;

    async fn start_transaction(&self) -> Result<Box<dyn Transaction>, MySqlAdapterError>;
}
