use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MySqlAdapterError;
use crate::native::NativePool;
use crate::observer::{QueryObserver, TracingObserver};
use crate::results::ResultSet;
use crate::traits::{DriverAdapter, Queryable, Transaction};
use crate::types::{ConnectionInfo, Query, TransactionOptions};

use super::config::MySqlAdapterOptions;
use super::executor::MySqlQueryable;
use super::normalize::normalize;
use super::transaction::MySqlTransaction;

/// Entry point bound to a connection pool.
///
/// Direct queries run on whatever connection the pool lends for that one
/// statement; `start_transaction` reserves a connection for the returned
/// transaction until it is committed or rolled back.
///
/// ```rust,no_run
/// # use mysql_driver_adapter::prelude::*;
/// # async fn demo<P: NativePool>(pool: P) -> Result<(), MySqlAdapterError> {
/// let adapter = MySqlAdapter::with_options(pool, MySqlAdapterOptions::default().with_schema("shop"))?;
/// let tx = adapter.start_transaction().await?;
/// tx.execute_raw(&Query::new("UPDATE stock SET qty = qty - 1 WHERE id = ?", vec![RowValues::Int(7)]))
///     .await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```
pub struct MySqlAdapter<P: NativePool> {
    queryable: MySqlQueryable<P>,
    options: MySqlAdapterOptions,
}

impl<P: NativePool> std::fmt::Debug for MySqlAdapter<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlAdapter")
            .field("queryable", &self.queryable)
            .field("options", &self.options)
            .finish()
    }
}

impl<P: NativePool> MySqlAdapter<P> {
    /// Adapter with default options, logging through `tracing`.
    #[must_use]
    pub fn new(pool: P) -> Self {
        Self {
            queryable: MySqlQueryable::new(pool, Arc::new(TracingObserver)),
            options: MySqlAdapterOptions::default(),
        }
    }

    /// # Errors
    /// Returns `MySqlAdapterError::ConfigError` if the options are invalid.
    pub fn with_options(pool: P, options: MySqlAdapterOptions) -> Result<Self, MySqlAdapterError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new(pool)
        })
    }

    /// Replace the observer used by this adapter and every transaction it opens.
    #[must_use]
    pub fn with_observer(self, observer: Arc<dyn QueryObserver>) -> Self {
        let pool = self.queryable.into_client();
        Self {
            queryable: MySqlQueryable::new(pool, observer),
            options: self.options,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &P {
        self.queryable.client()
    }

    #[must_use]
    pub fn options(&self) -> &MySqlAdapterOptions {
        &self.options
    }
}

#[async_trait]
impl<P: NativePool> Queryable for MySqlAdapter<P> {
    async fn query_raw(&self, query: &Query) -> Result<ResultSet, MySqlAdapterError> {
        self.queryable.query_raw(query).await
    }

    async fn execute_raw(&self, query: &Query) -> Result<u32, MySqlAdapterError> {
        self.queryable.execute_raw(query).await
    }
}

#[async_trait]
impl<P: NativePool> DriverAdapter for MySqlAdapter<P> {
    fn connection_info(&self) -> Result<ConnectionInfo, MySqlAdapterError> {
        Ok(ConnectionInfo {
            schema_name: self.options.schema.clone(),
        })
    }

    async fn start_transaction(&self) -> Result<Box<dyn Transaction>, MySqlAdapterError> {
        let options = TransactionOptions {
            use_phantom_query: false,
        };
        let observer = self.queryable.observer();
        observer.on_transaction("start_transaction", &options);

        let conn = self
            .queryable
            .client()
            .get_connection()
            .await
            .map_err(|err| {
                observer.on_native_error(&err);
                normalize(err)
            })?;

        Ok(Box::new(MySqlTransaction::new(
            conn,
            options,
            Arc::clone(observer),
        )))
    }
}
