use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::MySqlAdapterError;
use crate::native::NativeConnection;
use crate::observer::QueryObserver;
use crate::results::ResultSet;
use crate::traits::{Queryable, Transaction};
use crate::types::{Query, TransactionOptions};

use super::executor::MySqlQueryable;

/// A transaction scoped to one pooled connection.
///
/// The connection slot is `Some` while the transaction is open. `commit` and
/// `rollback` both take it and release the connection back to the pool, so
/// the release happens once no matter how many terminal calls race. Queries
/// hold the slot lock while they run, which keeps statements on this
/// transaction in issue order and makes a terminal call wait for them.
pub struct MySqlTransaction<C: NativeConnection> {
    slot: Mutex<Option<MySqlQueryable<C>>>,
    options: TransactionOptions,
    observer: Arc<dyn QueryObserver>,
}

impl<C: NativeConnection> std::fmt::Debug for MySqlTransaction<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlTransaction")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<C: NativeConnection> MySqlTransaction<C> {
    pub(crate) fn new(
        conn: C,
        options: TransactionOptions,
        observer: Arc<dyn QueryObserver>,
    ) -> Self {
        Self {
            slot: Mutex::new(Some(MySqlQueryable::new(conn, observer.clone()))),
            options,
            observer,
        }
    }

    /// `false` once `commit` or `rollback` has run.
    pub async fn is_open(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    async fn close(&self, tag: &'static str) -> Result<(), MySqlAdapterError> {
        let queryable = self
            .slot
            .lock()
            .await
            .take()
            .ok_or(MySqlAdapterError::TransactionClosed(tag))?;

        self.observer.on_transaction(tag, &self.options);
        queryable.into_client().release();
        Ok(())
    }
}

impl<C: NativeConnection> Drop for MySqlTransaction<C> {
    fn drop(&mut self) {
        if let Some(queryable) = self.slot.get_mut().take() {
            tracing::warn!(
                target: "mysql_driver_adapter",
                "transaction dropped without commit or rollback; releasing its connection"
            );
            queryable.into_client().release();
        }
    }
}

#[async_trait]
impl<C: NativeConnection> Queryable for MySqlTransaction<C> {
    async fn query_raw(&self, query: &Query) -> Result<ResultSet, MySqlAdapterError> {
        let slot = self.slot.lock().await;
        let queryable = slot
            .as_ref()
            .ok_or(MySqlAdapterError::TransactionClosed("query_raw"))?;
        queryable.query_raw(query).await
    }

    async fn execute_raw(&self, query: &Query) -> Result<u32, MySqlAdapterError> {
        let slot = self.slot.lock().await;
        let queryable = slot
            .as_ref()
            .ok_or(MySqlAdapterError::TransactionClosed("execute_raw"))?;
        queryable.execute_raw(query).await
    }
}

#[async_trait]
impl<C: NativeConnection> Transaction for MySqlTransaction<C> {
    fn options(&self) -> &TransactionOptions {
        &self.options
    }

    async fn commit(&self) -> Result<(), MySqlAdapterError> {
        self.close("commit").await
    }

    async fn rollback(&self) -> Result<(), MySqlAdapterError> {
        self.close("rollback").await
    }
}
