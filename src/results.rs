use serde::Serialize;

use crate::types::{ColumnType, RowValues};

/// Uniform output of one query.
///
/// `column_names` and `column_types` always have the same length, and every
/// row is positionally aligned with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub column_names: Vec<String>,
    pub column_types: Vec<ColumnType>,
    pub rows: Vec<Vec<RowValues>>,
    /// Decimal rendering of the native insert id, so 64-bit values survive intact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<String>,
}

impl ResultSet {
    /// Number of rows returned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value by row index and column name
    #[must_use]
    pub fn get(&self, row: usize, column_name: &str) -> Option<&RowValues> {
        let idx = self.column_index(column_name)?;
        self.rows.get(row).and_then(|values| values.get(idx))
    }
}
