use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use bb8::{Builder, ErrorSink, ManageConnection, Pool, PooledConnection, RunError, State};

use super::{NativeConnection, NativeError, NativeOutput, NativePool, NativeQueryable, QueryOptions};

/// bb8 reports connect failures to its error sink, never to the waiting
/// `get`, which only sees a timeout. This sink keeps the most recent one.
struct LastConnectError<E> {
    slot: Arc<Mutex<Option<(Instant, E)>>>,
}

impl<E> Clone for LastConnectError<E> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<E> Default for LastConnectError<E> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<E> fmt::Debug for LastConnectError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastConnectError").finish_non_exhaustive()
    }
}

impl<E> LastConnectError<E> {
    /// The last failure, if it happened at or after `since`.
    fn take_since(&self, since: Instant) -> Option<E> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .filter(|(at, _)| *at >= since)
            .map(|(_, error)| error)
    }
}

impl<E: fmt::Debug + Send + 'static> ErrorSink<E> for LastConnectError<E> {
    fn sink(&self, error: E) {
        tracing::debug!(target: "mysql_driver_adapter", ?error, "connection attempt failed");
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some((Instant::now(), error));
    }

    fn boxed_clone(&self) -> Box<dyn ErrorSink<E>> {
        Box::new(self.clone())
    }
}

/// A bb8 pool whose checkout failures carry the driver's own connect error.
pub struct ConnectionPool<M: ManageConnection> {
    pool: Pool<M>,
    connect_errors: LastConnectError<M::Error>,
}

impl<M: ManageConnection> Clone for ConnectionPool<M> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            connect_errors: self.connect_errors.clone(),
        }
    }
}

impl<M: ManageConnection> fmt::Debug for ConnectionPool<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl<M: ManageConnection> ConnectionPool<M> {
    /// Build the pool, waiting for the builder's `min_idle` connections.
    ///
    /// # Errors
    /// Returns the manager's error if an initial connection cannot be opened.
    pub async fn build(builder: Builder<M>, manager: M) -> Result<Self, M::Error> {
        let connect_errors = LastConnectError::default();
        let pool = builder
            .error_sink(Box::new(connect_errors.clone()))
            .build(manager)
            .await?;
        Ok(Self {
            pool,
            connect_errors,
        })
    }

    /// Build the pool without opening any connection up front.
    pub fn build_unchecked(builder: Builder<M>, manager: M) -> Self {
        let connect_errors = LastConnectError::default();
        let pool = builder
            .error_sink(Box::new(connect_errors.clone()))
            .build_unchecked(manager);
        Self {
            pool,
            connect_errors,
        }
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.pool.state()
    }

    #[must_use]
    pub fn inner(&self) -> &Pool<M> {
        &self.pool
    }
}

impl<M> ConnectionPool<M>
where
    M: ManageConnection,
    M::Error: Into<NativeError>,
{
    fn checkout_error(&self, err: RunError<M::Error>, started: Instant) -> NativeError {
        match err {
            RunError::User(err) => err.into(),
            RunError::TimedOut => self.connect_errors.take_since(started).map_or_else(
                || NativeError::other("timed out waiting for a pooled connection"),
                Into::into,
            ),
        }
    }
}

impl<M> NativeQueryable for PooledConnection<'static, M>
where
    M: ManageConnection,
    M::Connection: NativeQueryable,
{
    fn query(
        &self,
        options: QueryOptions<'_>,
    ) -> impl Future<Output = Result<NativeOutput, NativeError>> + Send {
        let conn: &M::Connection = self;
        conn.query(options)
    }
}

impl<M> NativeConnection for PooledConnection<'static, M>
where
    M: ManageConnection,
    M::Connection: NativeQueryable,
{
    fn release(self) {
        // bb8 puts the connection back on drop.
        drop(self);
    }
}

// Pool-level queries borrow a connection for the duration of one statement.
impl<M> NativeQueryable for ConnectionPool<M>
where
    M: ManageConnection,
    M::Connection: NativeQueryable,
    M::Error: Into<NativeError>,
{
    #[allow(clippy::manual_async_fn)]
    fn query(
        &self,
        options: QueryOptions<'_>,
    ) -> impl Future<Output = Result<NativeOutput, NativeError>> + Send {
        async move {
            let started = Instant::now();
            let conn = self
                .pool
                .get()
                .await
                .map_err(|err| self.checkout_error(err, started))?;
            let client: &M::Connection = &conn;
            client.query(options).await
        }
    }
}

impl<M> NativePool for ConnectionPool<M>
where
    M: ManageConnection,
    M::Connection: NativeQueryable,
    M::Error: Into<NativeError>,
{
    type Connection = PooledConnection<'static, M>;

    #[allow(clippy::manual_async_fn)]
    fn get_connection(
        &self,
    ) -> impl Future<Output = Result<Self::Connection, NativeError>> + Send {
        async move {
            let started = Instant::now();
            self.pool
                .get_owned()
                .await
                .map_err(|err| self.checkout_error(err, started))
        }
    }
}
