// MySQL module - turns native MySQL client output into the adapter contract
//
// - codes: wire type codes, column flags, charsets
// - conversion: column type classification and the per-field decoding policy
// - normalize: native error classification
// - query: result set building
// - executor: statement execution against a pool or a connection
// - transaction: connection-scoped transactions
// - adapter: the pool-bound entry point
// - config: adapter options and pool construction

pub mod adapter;
pub mod codes;
pub mod config;
pub mod conversion;
pub mod executor;
mod normalize;
pub mod query;
pub mod transaction;

pub use adapter::MySqlAdapter;
pub use codes::{BINARY_CHARSET, ColumnFlags, MySqlType};
pub use config::{MySqlAdapterOptions, build_pool, build_pool_with};
pub use conversion::{UnsupportedNativeDataType, field_to_column_type, type_cast};
pub use executor::MySqlQueryable;
pub use query::build_result_set;
pub use transaction::MySqlTransaction;
