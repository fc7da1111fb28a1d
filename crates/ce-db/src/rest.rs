//! PostgREST store backend (hosted Postgres behind a REST gateway)

use crate::error::{DbError, DbResult};
use crate::traits::{selected_columns, storable_row, Store};
use async_trait::async_trait;
use ce_core::{Row, TableSchema};
use reqwest::{Client, RequestBuilder, Response};

/// Store backed by a PostgREST-compatible HTTP API.
///
/// Tables must already exist on the server; [`Store::ensure_table`] only
/// checks that the table is reachable.
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Quote a value for a PostgREST `in.(...)` list.
fn quote_list_item(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Quote a column name for `select=` when it is not a plain identifier.
fn select_item(column: &str) -> String {
    if column
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        column.to_string()
    } else {
        quote_list_item(column)
    }
}

impl RestBackend {
    /// Create a backend rooted at `base_url` (e.g. `https://host/rest/v1`).
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn request(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, table);
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("apikey", key).bearer_auth(key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, table: &str) -> DbResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DbError::TableNotFound(format!("{}: {}", table, body)));
        }
        Err(DbError::RequestFailed {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch_rows(&self, builder: RequestBuilder, table: &str) -> DbResult<Vec<Row>> {
        let body: serde_json::Value = self.send(builder, table).await?.json().await?;
        let items = body.as_array().ok_or_else(|| {
            DbError::InvalidResponse(format!("expected a JSON array from {}", table))
        })?;
        items
            .iter()
            .map(|item| {
                Row::from_json(item).ok_or_else(|| {
                    DbError::InvalidResponse(format!("expected JSON objects from {}", table))
                })
            })
            .collect()
    }
}

#[async_trait]
impl Store for RestBackend {
    async fn ensure_table(&self, schema: &TableSchema) -> DbResult<()> {
        let builder = self
            .request(reqwest::Method::GET, &schema.table)
            .query(&[("select", select_item(&schema.key)), ("limit", "0".to_string())]);
        self.send(builder, &schema.table).await?;
        Ok(())
    }

    async fn upsert(&self, schema: &TableSchema, rows: &[Row]) -> DbResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let payload: Vec<Row> = rows.iter().map(|r| storable_row(schema, r)).collect();
        let builder = self
            .request(reqwest::Method::POST, &schema.table)
            .query(&[("on_conflict", schema.key.as_str())])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&payload);
        self.send(builder, &schema.table).await?;
        log::debug!("rest: upserted {} row(s) into {}", payload.len(), schema.table);
        Ok(payload.len())
    }

    async fn delete_absent(&self, schema: &TableSchema, keep: &[String]) -> DbResult<usize> {
        if keep.is_empty() {
            return Ok(0);
        }
        let list: Vec<String> = keep.iter().map(|k| quote_list_item(k)).collect();
        let filter = format!("not.in.({})", list.join(","));
        let builder = self
            .request(reqwest::Method::DELETE, &schema.table)
            .query(&[(schema.key.as_str(), filter.as_str())])
            .header("Prefer", "return=representation");
        let deleted = self.fetch_rows(builder, &schema.table).await?.len();
        log::debug!("rest: deleted {} stale row(s) from {}", deleted, schema.table);
        Ok(deleted)
    }

    async fn query_one(
        &self,
        schema: &TableSchema,
        key: &str,
        columns: &[String],
    ) -> DbResult<Option<Row>> {
        let columns = selected_columns(schema, columns)?;
        let select: Vec<String> = columns.iter().map(|c| select_item(c)).collect();
        let builder = self.request(reqwest::Method::GET, &schema.table).query(&[
            ("select".to_string(), select.join(",")),
            (schema.key.clone(), format!("eq.{}", key.trim())),
            ("limit".to_string(), "1".to_string()),
        ]);
        let row = self.fetch_rows(builder, &schema.table).await?.into_iter().next();
        Ok(row.map(|r| r.project(&columns)))
    }

    async fn select_all(&self, schema: &TableSchema) -> DbResult<Vec<Row>> {
        let builder = self
            .request(reqwest::Method::GET, &schema.table)
            .query(&[
                ("select", "*".to_string()),
                ("order", format!("{}.asc", select_item(&schema.key))),
            ]);
        let columns = schema.column_names();
        Ok(self
            .fetch_rows(builder, &schema.table)
            .await?
            .into_iter()
            .map(|r| r.project(&columns))
            .collect())
    }

    async fn count(&self, schema: &TableSchema) -> DbResult<usize> {
        let builder = self
            .request(reqwest::Method::GET, &schema.table)
            .query(&[("select", select_item(&schema.key))]);
        Ok(self.fetch_rows(builder, &schema.table).await?.len())
    }

    fn store_type(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
