use crate::error::DriverAdapterError;
use crate::native::{NativeData, NativeOutput};
use crate::results::ResultSet;
use crate::types::ColumnType;

use super::conversion::field_to_column_type;

/// Build a `ResultSet` from native output.
///
/// # Errors
/// Returns `UnsupportedNativeDataType` if any column cannot be classified; no
/// partial result is produced in that case.
pub fn build_result_set(output: NativeOutput) -> Result<ResultSet, DriverAdapterError> {
    let NativeOutput { data, fields } = output;

    let column_types = fields
        .iter()
        .map(field_to_column_type)
        .collect::<Result<Vec<ColumnType>, _>>()?;
    let column_names: Vec<String> = fields.into_iter().map(|field| field.name).collect();

    let (rows, last_insert_id) = match data {
        NativeData::Rows(rows) => (rows, None),
        NativeData::Header(header) => (
            Vec::new(),
            header.insert_id.map(|id| id.to_string()),
        ),
    };

    Ok(ResultSet {
        column_names,
        column_types,
        rows,
        last_insert_id,
    })
}

/// Affected-row count of a statement; for row-returning statements this is
/// the number of rows, as the server reports it.
#[must_use]
pub fn affected_rows(output: &NativeOutput) -> u64 {
    match &output.data {
        NativeData::Header(header) => header.affected_rows,
        NativeData::Rows(rows) => rows.len() as u64,
    }
}
