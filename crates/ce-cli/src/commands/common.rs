//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use ce_core::{CellValue, Row};
use std::path::Path;

/// Read a whole input file.
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Split a comma-separated argument, dropping empty entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn print_json(value: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn display(value: &CellValue) -> String {
    match value {
        CellValue::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Format rows as an aligned table, one column per row key.
pub(crate) fn format_rows(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return "(no rows)\n".to_string();
    };
    let columns: Vec<&str> = first.columns().collect();
    let widths: Vec<usize> = columns
        .iter()
        .map(|col| {
            rows.iter()
                .map(|r| display(&r.value(col)).chars().count())
                .max()
                .unwrap_or(0)
                .max(col.chars().count())
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(columns.iter().map(|c| c.to_string()).collect()));
    out.push('\n');
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(columns.iter().map(|c| display(&row.value(c))).collect()));
        out.push('\n');
    }
    out
}

/// Format one row as `column: value` lines.
pub(crate) fn format_record(row: &Row) -> String {
    let width = row.columns().map(|c| c.chars().count()).max().unwrap_or(0);
    row.iter()
        .map(|(col, value)| format!("{:<width$}  {}\n", col, display(value), width = width))
        .collect()
}

pub(crate) fn rows_to_json(rows: &[Row]) -> serde_json::Value {
    serde_json::Value::Array(rows.iter().map(Row::to_json).collect())
}
