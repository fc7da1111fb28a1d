//! Store trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use ce_core::{CellValue, ColumnKind, Row, TableSchema};

/// Keyed table store for the ledger tables
///
/// Every operation takes the table's [`TableSchema`], which names the table,
/// its business key column and its canonical columns.
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create the table if it does not exist (or verify it is reachable)
    async fn ensure_table(&self, schema: &TableSchema) -> DbResult<()>;

    /// Insert rows, updating existing rows that share the key. Returns rows written.
    async fn upsert(&self, schema: &TableSchema, rows: &[Row]) -> DbResult<usize>;

    /// Delete every row whose key is not in `keep`. Returns rows deleted.
    ///
    /// An empty `keep` deletes nothing.
    async fn delete_absent(&self, schema: &TableSchema, keep: &[String]) -> DbResult<usize>;

    /// Fetch the row with the given key, restricted to `columns`
    /// (all schema columns when empty)
    async fn query_one(
        &self,
        schema: &TableSchema,
        key: &str,
        columns: &[String],
    ) -> DbResult<Option<Row>>;

    /// Every row of the table, ordered by key
    async fn select_all(&self, schema: &TableSchema) -> DbResult<Vec<Row>>;

    /// Number of rows in the table
    async fn count(&self, schema: &TableSchema) -> DbResult<usize>;

    /// Store type identifier for logging
    fn store_type(&self) -> &'static str;
}

/// Columns a query returns: the requested ones after validation, or all.
pub(crate) fn selected_columns(schema: &TableSchema, columns: &[String]) -> DbResult<Vec<String>> {
    if columns.is_empty() {
        return Ok(schema.columns.iter().map(|c| c.name.clone()).collect());
    }
    schema.check_columns(columns)?;
    Ok(columns.to_vec())
}

/// Shape a value for a typed column before it is written.
///
/// Numeric columns cannot hold text, so text that does not parse as a number
/// is stored as null.
pub(crate) fn storable(kind: ColumnKind, column: &str, value: &CellValue) -> CellValue {
    match (kind, value) {
        (ColumnKind::Number, CellValue::Number(_)) | (_, CellValue::Null) => value.clone(),
        (ColumnKind::Number, other) => match other.as_f64() {
            Some(n) => CellValue::Number(n),
            None => {
                log::warn!(
                    "Column '{}' is numeric, storing null instead of '{}'",
                    column,
                    other
                );
                CellValue::Null
            }
        },
        (ColumnKind::Text | ColumnKind::Date, CellValue::Text(_)) => value.clone(),
        (ColumnKind::Text | ColumnKind::Date, other) => CellValue::Text(other.to_string()),
    }
}

/// Project a row onto the schema's columns in storage form.
pub(crate) fn storable_row(schema: &TableSchema, row: &Row) -> Row {
    schema
        .columns
        .iter()
        .map(|c| (c.name.clone(), storable(c.kind, &c.name, &row.value(&c.name))))
        .collect()
}
