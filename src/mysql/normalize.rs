use serde_json::{Map, Value as JsonValue};

use crate::error::{DriverAdapterError, MySqlAdapterError};
use crate::native::{NativeError, ServerError};

impl From<ServerError> for DriverAdapterError {
    fn from(err: ServerError) -> Self {
        let ServerError {
            code,
            errno,
            message,
            state,
            fields,
        } = err;

        let mut meta: Map<String, JsonValue> = fields;
        meta.insert("errno".into(), JsonValue::from(errno));
        meta.insert("message".into(), JsonValue::from(message.clone()));
        meta.insert("state".into(), JsonValue::from(state.clone()));
        meta.insert(
            "code_name".into(),
            code.clone().map_or(JsonValue::Null, JsonValue::from),
        );
        meta.insert("code".into(), JsonValue::from(errno));

        DriverAdapterError::Mysql {
            code: errno,
            code_name: code,
            message,
            state,
            meta,
        }
    }
}

/// Classify a native failure. Server errors become structured `Mysql` errors;
/// anything else is handed back untouched as `MySqlAdapterError::Native`.
pub(crate) fn normalize(err: NativeError) -> MySqlAdapterError {
    match err {
        NativeError::Server(server) => MySqlAdapterError::Driver(server.into()),
        NativeError::Other(fault) => MySqlAdapterError::Native(fault),
    }
}
