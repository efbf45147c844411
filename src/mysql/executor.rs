use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MySqlAdapterError;
use crate::native::{NativeOutput, NativeQueryable, QueryOptions};
use crate::observer::QueryObserver;
use crate::results::ResultSet;
use crate::traits::Queryable;
use crate::types::Query;

use super::conversion::type_cast;
use super::normalize::normalize;
use super::query::{affected_rows, build_result_set};

/// Runs queries against one native target (a pool or a single connection)
/// and turns the native output into the adapter's uniform shapes.
pub struct MySqlQueryable<C> {
    client: C,
    observer: Arc<dyn QueryObserver>,
}

// Manual Debug implementation because native clients need not implement `Debug`
impl<C> std::fmt::Debug for MySqlQueryable<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlQueryable")
            .field("client", &std::any::type_name::<C>())
            .field("observer", &self.observer)
            .finish()
    }
}

impl<C: NativeQueryable> MySqlQueryable<C> {
    #[must_use]
    pub fn new(client: C, observer: Arc<dyn QueryObserver>) -> Self {
        Self { client, observer }
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    pub(crate) fn observer(&self) -> &Arc<dyn QueryObserver> {
        &self.observer
    }

    pub(crate) fn into_client(self) -> C {
        self.client
    }

    /// Run a query and return its rows.
    ///
    /// Rows are requested as positional arrays; TIMESTAMP, DATETIME, DATE and
    /// BIGINT values arrive as their wire text.
    ///
    /// # Errors
    /// `Driver(Mysql)` when the driver rejects the query,
    /// `Driver(UnsupportedNativeDataType)` when a column cannot be classified,
    /// and `Native` for any other driver fault.
    pub async fn query_raw(&self, query: &Query) -> Result<ResultSet, MySqlAdapterError> {
        self.observer.before_query("query_raw", query);

        let output = self
            .perform_io(QueryOptions {
                sql: &query.sql,
                values: &query.args,
                rows_as_array: true,
                type_cast: Some(type_cast),
            })
            .await?;

        Ok(build_result_set(output)?)
    }

    /// Run a statement and return the number of affected rows.
    ///
    /// # Errors
    /// Same classification as [`Self::query_raw`], minus column typing.
    pub async fn execute_raw(&self, query: &Query) -> Result<u32, MySqlAdapterError> {
        self.observer.before_query("execute_raw", query);

        let output = self
            .perform_io(QueryOptions::new(&query.sql, &query.args))
            .await?;

        let affected = affected_rows(&output);
        Ok(u32::try_from(affected).unwrap_or_else(|_| {
            tracing::warn!(
                target: "mysql_driver_adapter",
                affected,
                "affected row count exceeds u32, reporting u32::MAX"
            );
            u32::MAX
        }))
    }

    /// Single path through which every statement reaches the driver.
    async fn perform_io(&self, options: QueryOptions<'_>) -> Result<NativeOutput, MySqlAdapterError> {
        self.client.query(options).await.map_err(|err| {
            self.observer.on_native_error(&err);
            normalize(err)
        })
    }
}

#[async_trait]
impl<C: NativeQueryable> Queryable for MySqlQueryable<C> {
    async fn query_raw(&self, query: &Query) -> Result<ResultSet, MySqlAdapterError> {
        MySqlQueryable::query_raw(self, query).await
    }

    async fn execute_raw(&self, query: &Query) -> Result<u32, MySqlAdapterError> {
        MySqlQueryable::execute_raw(self, query).await
    }
}
