//! DuckDB store backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{selected_columns, storable_row, Store};
use async_trait::async_trait;
use ce_core::{CellValue, Row, TableSchema};
use duckdb::types::Value;
use duckdb::{params_from_iter, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB store backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

/// Quote a SQL identifier with double quotes, escaping embedded quotes.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn to_sql_value(value: &CellValue) -> Value {
    match value {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Boolean(*b),
        CellValue::Number(n) => Value::Double(*n),
        CellValue::Text(s) => Value::Text(s.clone()),
    }
}

fn from_sql_value(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Boolean(b) => CellValue::Bool(b),
        Value::Double(n) => CellValue::Number(n),
        Value::Float(n) => CellValue::Number(n as f64),
        Value::TinyInt(n) => CellValue::Number(n as f64),
        Value::SmallInt(n) => CellValue::Number(n as f64),
        Value::Int(n) => CellValue::Number(n as f64),
        Value::BigInt(n) => CellValue::Number(n as f64),
        Value::Text(s) => CellValue::Text(s),
        other => CellValue::Text(format!("{:?}", other)),
    }
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn ensure_table_sync(&self, schema: &TableSchema) -> DbResult<()> {
        let columns: Vec<String> = schema
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), c.kind.sql_type()))
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({}, PRIMARY KEY ({}))",
            quote_ident(&schema.table),
            columns.join(", "),
            quote_ident(&schema.key)
        );
        let conn = self.lock()?;
        conn.execute_batch(&sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    fn upsert_sync(&self, schema: &TableSchema, rows: &[Row]) -> DbResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let names: Vec<String> = schema.columns.iter().map(|c| quote_ident(&c.name)).collect();
        let placeholders = vec!["?"; names.len()].join(", ");
        let updates: Vec<String> = schema
            .columns
            .iter()
            .filter(|c| c.name != schema.key)
            .map(|c| format!("{0} = excluded.{0}", quote_ident(&c.name)))
            .collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {}",
            quote_ident(&schema.table),
            names.join(", "),
            placeholders,
            quote_ident(&schema.key),
            updates.join(", ")
        );

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                let stored = storable_row(schema, row);
                let params: Vec<Value> = stored.iter().map(|(_, v)| to_sql_value(v)).collect();
                written += stmt.execute(params_from_iter(params))?;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    fn delete_absent_sync(&self, schema: &TableSchema, keep: &[String]) -> DbResult<usize> {
        if keep.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; keep.len()].join(", ");
        let sql = format!(
            "DELETE FROM {} WHERE {} NOT IN ({})",
            quote_ident(&schema.table),
            quote_ident(&schema.key),
            placeholders
        );
        let conn = self.lock()?;
        Ok(conn.execute(&sql, params_from_iter(keep.iter()))?)
    }

    fn select_sync(
        &self,
        schema: &TableSchema,
        columns: &[String],
        key: Option<&str>,
    ) -> DbResult<Vec<Row>> {
        let select: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        let mut sql = format!(
            "SELECT {} FROM {}",
            select.join(", "),
            quote_ident(&schema.table)
        );
        let params: Vec<Value> = match key {
            Some(k) => {
                sql.push_str(&format!(" WHERE {} = ? LIMIT 1", quote_ident(&schema.key)));
                vec![Value::Text(k.to_string())]
            }
            None => {
                sql.push_str(&format!(" ORDER BY {}", quote_ident(&schema.key)));
                Vec::new()
            }
        };

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let width = columns.len();
        let values = stmt.query_map(params_from_iter(params), |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut rows = Vec::new();
        for row_values in values {
            let row: Row = columns
                .iter()
                .cloned()
                .zip(row_values?.into_iter().map(from_sql_value))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }

    fn count_sync(&self, schema: &TableSchema) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(&schema.table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[async_trait]
impl Store for DuckDbBackend {
    async fn ensure_table(&self, schema: &TableSchema) -> DbResult<()> {
        self.ensure_table_sync(schema)
    }

    async fn upsert(&self, schema: &TableSchema, rows: &[Row]) -> DbResult<usize> {
        let written = self.upsert_sync(schema, rows)?;
        log::debug!("duckdb: upserted {} row(s) into {}", written, schema.table);
        Ok(written)
    }

    async fn delete_absent(&self, schema: &TableSchema, keep: &[String]) -> DbResult<usize> {
        let deleted = self.delete_absent_sync(schema, keep)?;
        log::debug!("duckdb: deleted {} stale row(s) from {}", deleted, schema.table);
        Ok(deleted)
    }

    async fn query_one(
        &self,
        schema: &TableSchema,
        key: &str,
        columns: &[String],
    ) -> DbResult<Option<Row>> {
        let columns = selected_columns(schema, columns)?;
        Ok(self
            .select_sync(schema, &columns, Some(key.trim()))?
            .into_iter()
            .next())
    }

    async fn select_all(&self, schema: &TableSchema) -> DbResult<Vec<Row>> {
        let columns = selected_columns(schema, &[])?;
        self.select_sync(schema, &columns, None)
    }

    async fn count(&self, schema: &TableSchema) -> DbResult<usize> {
        self.count_sync(schema)
    }

    fn store_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
