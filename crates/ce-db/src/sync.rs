//! Keyed table synchronization: dedupe, delete stale keys, upsert.

use crate::error::DbResult;
use crate::traits::Store;
use ce_core::{CellValue, Row, TableSchema};
use serde_json::json;
use std::collections::HashMap;

/// Outcome of a keyed sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Rows handed in
    pub received: usize,
    /// Rows written after deduplication
    pub upserted: usize,
    /// Stored rows removed because their key disappeared
    pub deleted: usize,
    /// Rows superseded by a later row with the same key
    pub duplicates: usize,
    /// Rows dropped for having a blank key
    pub blank_keys: usize,
}

impl SyncReport {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "received": self.received,
            "upserted": self.upserted,
            "deleted": self.deleted,
            "duplicates": self.duplicates,
            "blank_keys": self.blank_keys,
        })
    }
}

/// Rows after [`dedupe_by_key`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deduped {
    pub rows: Vec<Row>,
    pub duplicates: usize,
    pub blank_keys: usize,
}

impl Deduped {
    /// Keys of the surviving rows, in order.
    pub fn keys(&self, key: &str) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|r| r.get(key).and_then(CellValue::as_text))
            .collect()
    }
}

/// Keep the last row for each key, at the position of the key's first
/// occurrence. Rows whose key is blank are dropped. Keys are compared after
/// trimming and the surviving row carries the trimmed key.
pub fn dedupe_by_key(rows: Vec<Row>, key: &str) -> Deduped {
    let mut out: Vec<Row> = Vec::with_capacity(rows.len());
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut duplicates = 0;
    let mut blank_keys = 0;

    for mut row in rows {
        let Some(k) = row.get(key).and_then(CellValue::as_text) else {
            blank_keys += 1;
            continue;
        };
        row.set(key, k.as_str());
        match position.get(&k) {
            Some(&idx) => {
                out[idx] = row;
                duplicates += 1;
            }
            None => {
                position.insert(k, out.len());
                out.push(row);
            }
        }
    }

    if duplicates > 0 {
        log::warn!("{} duplicate '{}' row(s) superseded by later rows", duplicates, key);
    }
    if blank_keys > 0 {
        log::warn!("{} row(s) without a '{}' value dropped", blank_keys, key);
    }
    Deduped {
        rows: out,
        duplicates,
        blank_keys,
    }
}

/// Make the table hold exactly `rows`: dedupe by key, delete every stored row
/// whose key is absent from the new set, then upsert.
///
/// An empty (or all-blank-key) set deletes nothing. Delete and upsert are
/// separate operations; a failing upsert leaves the deletions in place.
pub async fn replace_keyed(
    store: &dyn Store,
    schema: &TableSchema,
    rows: Vec<Row>,
) -> DbResult<SyncReport> {
    let received = rows.len();
    store.ensure_table(schema).await?;
    let deduped = dedupe_by_key(rows, &schema.key);

    let deleted = if deduped.rows.is_empty() {
        log::warn!(
            "No keyed rows for {}, skipping deletion of existing rows",
            schema.table
        );
        0
    } else {
        store
            .delete_absent(schema, &deduped.keys(&schema.key))
            .await?
    };
    let upserted = store.upsert(schema, &deduped.rows).await?;

    Ok(SyncReport {
        received,
        upserted,
        deleted,
        duplicates: deduped.duplicates,
        blank_keys: deduped.blank_keys,
    })
}

/// Insert new and update changed rows; never delete.
pub async fn merge_keyed(
    store: &dyn Store,
    schema: &TableSchema,
    rows: Vec<Row>,
) -> DbResult<SyncReport> {
    let received = rows.len();
    store.ensure_table(schema).await?;
    let deduped = dedupe_by_key(rows, &schema.key);
    let upserted = store.upsert(schema, &deduped.rows).await?;
    Ok(SyncReport {
        received,
        upserted,
        deleted: 0,
        duplicates: deduped.duplicates,
        blank_keys: deduped.blank_keys,
    })
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
