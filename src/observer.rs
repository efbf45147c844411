//! Hooks the adapter calls before running SQL, when the driver fails, and on
//! transaction lifecycle events.

use std::fmt::Debug;

use crate::native::NativeError;
use crate::types::{Query, TransactionOptions};

pub trait QueryObserver: Send + Sync + Debug {
    /// Called before a statement is handed to the driver. `tag` names the operation.
    fn before_query(&self, tag: &'static str, query: &Query);

    /// Called with the raw driver error before it is classified.
    fn on_native_error(&self, error: &NativeError);

    /// `start_transaction`, `commit`, `rollback`.
    fn on_transaction(&self, tag: &'static str, options: &TransactionOptions);
}

/// Default observer: `tracing` events at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn before_query(&self, tag: &'static str, query: &Query) {
        tracing::debug!(
            target: "mysql_driver_adapter",
            tag,
            sql = %query.sql,
            args = ?query.args,
            "running query"
        );
    }

    fn on_native_error(&self, error: &NativeError) {
        tracing::debug!(target: "mysql_driver_adapter", error = %error, "error in perform_io");
    }

    fn on_transaction(&self, tag: &'static str, options: &TransactionOptions) {
        tracing::debug!(target: "mysql_driver_adapter", tag, ?options, "transaction");
    }
}
