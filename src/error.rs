use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Failure surfaced to the consumer as a tagged value.
///
/// Serializes with a `kind` discriminant, e.g.
/// `{"kind":"UnsupportedNativeDataType","type":"GEOMETRY"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind")]
pub enum DriverAdapterError {
    /// A result column's native type has no portable mapping.
    #[error("Unsupported native data type: {type_name}")]
    UnsupportedNativeDataType {
        #[serde(rename = "type")]
        type_name: String,
    },

    /// The MySQL server or client library rejected the statement.
    #[error("MySQL error {code} ({state}): {message}")]
    Mysql {
        /// Numeric error number (`errno`), e.g. 1064.
        code: u16,
        /// Symbolic error code, e.g. `ER_PARSE_ERROR`.
        code_name: Option<String>,
        message: String,
        /// Five-character SQLSTATE.
        state: String,
        /// Every field the native error carried.
        meta: Map<String, JsonValue>,
    },
}

impl DriverAdapterError {
    /// The serialized `kind` tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedNativeDataType { .. } => "UnsupportedNativeDataType",
            Self::Mysql { .. } => "Mysql",
        }
    }
}

#[derive(Debug, Error)]
pub enum MySqlAdapterError {
    #[error(transparent)]
    Driver(#[from] DriverAdapterError),

    #[error("Transaction already closed: cannot {0}")]
    TransactionClosed(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Anything the driver raised that is not a server/query error. Carried unchanged.
    #[error(transparent)]
    Native(Box<dyn std::error::Error + Send + Sync>),
}

impl MySqlAdapterError {
    /// The structured error, if this failure is one.
    #[must_use]
    pub fn structured(&self) -> Option<&DriverAdapterError> {
        match self {
            Self::Driver(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_serializes_with_kind_tag() {
        let err = DriverAdapterError::UnsupportedNativeDataType {
            type_name: "GEOMETRY".into(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "UnsupportedNativeDataType", "type": "GEOMETRY"})
        );
        assert_eq!(err.to_string(), "Unsupported native data type: GEOMETRY");
    }

    #[test]
    fn mysql_error_serializes_payload() {
        let mut meta = Map::new();
        meta.insert("fatal".into(), JsonValue::Bool(false));
        let err = DriverAdapterError::Mysql {
            code: 1146,
            code_name: Some("ER_NO_SUCH_TABLE".into()),
            message: "Table 'test.missing' doesn't exist".into(),
            state: "42S02".into(),
            meta,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "Mysql");
        assert_eq!(json["code"], 1146);
        assert_eq!(json["code_name"], "ER_NO_SUCH_TABLE");
        assert_eq!(json["state"], "42S02");
        assert_eq!(json["meta"]["fatal"], false);
        assert_eq!(err.kind(), "Mysql");
    }

    #[test]
    fn structured_is_none_for_faults() {
        let closed = MySqlAdapterError::TransactionClosed("commit");
        assert!(closed.structured().is_none());
        assert_eq!(
            closed.to_string(),
            "Transaction already closed: cannot commit"
        );

        let driver: MySqlAdapterError = DriverAdapterError::UnsupportedNativeDataType {
            type_name: "SET".into(),
        }
        .into();
        assert_eq!(
            driver.structured().map(DriverAdapterError::kind),
            Some("UnsupportedNativeDataType")
        );
    }
}
