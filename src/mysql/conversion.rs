use thiserror::Error;

use super::codes::{BINARY_CHARSET, ColumnFlags, MySqlType};
use crate::error::DriverAdapterError;
use crate::native::{FieldDecoding, FieldPacket};
use crate::types::ColumnType;

/// Raised when a column's native type has no portable mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported native data type: {type_name}")]
pub struct UnsupportedNativeDataType {
    pub type_name: &'static str,
}

impl UnsupportedNativeDataType {
    fn new(field: &FieldPacket) -> Self {
        Self {
            type_name: MySqlType::name_of(field.column_type),
        }
    }
}

impl From<UnsupportedNativeDataType> for DriverAdapterError {
    fn from(err: UnsupportedNativeDataType) -> Self {
        DriverAdapterError::UnsupportedNativeDataType {
            type_name: err.type_name.to_string(),
        }
    }
}

type Rule = (fn(&FieldPacket) -> bool, ColumnType);

/// Evaluated top to bottom; the first matching predicate wins.
const RULES: &[Rule] = &[
    (is_numeric, ColumnType::Numeric),
    (is_float, ColumnType::Float),
    (is_double, ColumnType::Double),
    (is_int32, ColumnType::Int32),
    (is_int64, ColumnType::Int64),
    (is_date_time, ColumnType::DateTime),
    (is_time, ColumnType::Time),
    (is_date, ColumnType::Date),
    (is_text, ColumnType::Text),
    (is_bytes, ColumnType::Bytes),
    (is_bool, ColumnType::Boolean),
    (is_json, ColumnType::Json),
    (is_enum, ColumnType::Enum),
    // Quirk: an all-NULL column (`SELECT NULL`) has no real type; Int32 is what
    // consumers have always received for it.
    (is_null, ColumnType::Int32),
];

/// Map a native column definition to its portable column type.
///
/// # Errors
/// Returns `UnsupportedNativeDataType` naming the native type when no rule matches.
pub fn field_to_column_type(field: &FieldPacket) -> Result<ColumnType, UnsupportedNativeDataType> {
    RULES
        .iter()
        .find(|(applies, _)| applies(field))
        .map(|&(_, column_type)| column_type)
        .ok_or_else(|| UnsupportedNativeDataType::new(field))
}

/// Decoding policy handed to the client: temporal and BIGINT columns come back
/// as their exact wire text so no precision or timezone is lost here.
#[must_use]
pub fn type_cast(field: &FieldPacket) -> FieldDecoding {
    match MySqlType::from_code(field.column_type) {
        Some(
            MySqlType::Timestamp | MySqlType::DateTime | MySqlType::Date | MySqlType::LongLong,
        ) => FieldDecoding::Text,
        _ => FieldDecoding::Default,
    }
}

fn native_type(field: &FieldPacket) -> Option<MySqlType> {
    MySqlType::from_code(field.column_type)
}

fn is_type(field: &FieldPacket, types: &[MySqlType]) -> bool {
    native_type(field).is_some_and(|ty| types.contains(&ty))
}

fn has_flag(field: &FieldPacket, flag: u16) -> bool {
    ColumnFlags(field.flags).contains(flag)
}

const BLOB_TYPES: &[MySqlType] = &[
    MySqlType::TinyBlob,
    MySqlType::MediumBlob,
    MySqlType::LongBlob,
    MySqlType::Blob,
];

fn is_numeric(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Decimal, MySqlType::NewDecimal])
}

fn is_float(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Float])
}

fn is_double(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Double])
}

fn is_int32(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Tiny, MySqlType::Short, MySqlType::Year])
        || (is_type(field, &[MySqlType::Long, MySqlType::Int24])
            && !has_flag(field, ColumnFlags::UNSIGNED))
}

fn is_int64(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::LongLong])
        || (is_type(field, &[MySqlType::Long, MySqlType::Int24])
            && has_flag(field, ColumnFlags::UNSIGNED))
}

fn is_date_time(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Timestamp, MySqlType::DateTime])
}

fn is_time(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Time])
}

fn is_date(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Date, MySqlType::NewDate])
}

fn is_text(field: &FieldPacket) -> bool {
    is_type(
        field,
        &[MySqlType::VarChar, MySqlType::VarString, MySqlType::String],
    ) || (is_type(field, BLOB_TYPES) && field.character_set != BINARY_CHARSET)
}

fn is_bytes(field: &FieldPacket) -> bool {
    (is_type(field, BLOB_TYPES) && field.character_set == BINARY_CHARSET)
        || (is_type(field, &[MySqlType::Bit]) && field.column_length > 1)
}

fn is_bool(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Bit]) && field.column_length == 1
}

fn is_json(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Json])
}

fn is_enum(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Enum]) || has_flag(field, ColumnFlags::ENUM)
}

fn is_null(field: &FieldPacket) -> bool {
    is_type(field, &[MySqlType::Null])
}
