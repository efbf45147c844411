use bb8::{Builder, ManageConnection, Pool};
use serde::{Deserialize, Serialize};

use crate::error::MySqlAdapterError;
use crate::native::{ConnectionPool, NativeQueryable};

/// Static adapter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MySqlAdapterOptions {
    /// Schema (database) the consumer should treat as default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl MySqlAdapterOptions {
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Check the options before an adapter is built from them.
    ///
    /// # Errors
    /// Returns `MySqlAdapterError::ConfigError` for a blank schema name.
    pub fn validate(&self) -> Result<(), MySqlAdapterError> {
        if let Some(schema) = &self.schema {
            if schema.trim().is_empty() {
                return Err(MySqlAdapterError::ConfigError(
                    "schema must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Build a connection pool for a native connection manager with bb8's default sizing.
///
/// # Errors
/// Returns `MySqlAdapterError::ConnectionError` if the pool cannot be built.
pub async fn build_pool<M>(manager: M) -> Result<ConnectionPool<M>, MySqlAdapterError>
where
    M: ManageConnection,
    M::Connection: NativeQueryable,
{
    build_pool_with(Pool::builder(), manager).await
}

/// Same as [`build_pool`], sized and timed by a caller-supplied bb8 builder.
///
/// # Errors
/// Returns `MySqlAdapterError::ConnectionError` if the pool cannot be built.
pub async fn build_pool_with<M>(
    builder: Builder<M>,
    manager: M,
) -> Result<ConnectionPool<M>, MySqlAdapterError>
where
    M: ManageConnection,
    M::Connection: NativeQueryable,
{
    ConnectionPool::build(builder, manager)
        .await
        .map_err(|e| MySqlAdapterError::ConnectionError(format!("mysql pool error: {e:?}")))
}
