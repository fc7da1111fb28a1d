//! Workbook to canonical rows.

use crate::clean::clean_row;
use crate::error::{IngestError, IngestResult};
use crate::header::{find_header_row, map_columns, HeaderMatch, HEADER_SCAN_LIMIT};
use crate::workbook::{read_workbook, Grid, Workbook};
use ce_core::{CellValue, Row, TableSchema};

/// Sheet name of the PO workbook's POP tab.
pub const PO_SHEET: &str = "684 POP";

/// Where to find a table in a workbook and how to read it.
#[derive(Debug, Clone)]
pub struct IngestSpec {
    /// Target schema
    pub schema: TableSchema,
    /// Sheet name; `None` reads the first sheet
    pub sheet: Option<String>,
    /// Text of a header cell identifying the header row
    pub marker: String,
    /// Header normalization used for column mapping
    pub matching: HeaderMatch,
    /// Rows searched for the marker
    pub scan_limit: usize,
}

impl IngestSpec {
    /// LMC budget master: first sheet, header marked by `SiteID`.
    pub fn budget(table: &str) -> Self {
        Self {
            schema: TableSchema::budget(table),
            sheet: None,
            marker: "SiteID".to_string(),
            matching: HeaderMatch::Whitespace,
            scan_limit: HEADER_SCAN_LIMIT,
        }
    }

    /// DN master workbook: first sheet, header marked by `Sr. No.`.
    pub fn dn_master(table: &str) -> Self {
        Self {
            schema: TableSchema::dn_master(table),
            sheet: None,
            marker: "Sr. No.".to_string(),
            matching: HeaderMatch::Whitespace,
            scan_limit: HEADER_SCAN_LIMIT,
        }
    }

    /// PO workbook: the `684 POP` sheet, header marked by `siteid`,
    /// punctuation-insensitive column matching.
    pub fn po_master(table: &str) -> Self {
        Self {
            schema: TableSchema::po_master(table),
            sheet: Some(PO_SHEET.to_string()),
            marker: "siteid".to_string(),
            matching: HeaderMatch::Alphanumeric,
            scan_limit: HEADER_SCAN_LIMIT,
        }
    }
}

/// Ingest workbook bytes into canonical rows.
pub fn ingest(bytes: Vec<u8>, spec: &IngestSpec) -> IngestResult<Vec<Row>> {
    let workbook = read_workbook(bytes)?;
    ingest_workbook(&workbook, spec)
}

/// Ingest an already opened workbook.
pub fn ingest_workbook(workbook: &Workbook, spec: &IngestSpec) -> IngestResult<Vec<Row>> {
    let (name, grid) = match &spec.sheet {
        Some(sheet) => (sheet.as_str(), workbook.sheet(sheet)?),
        None => workbook.first_sheet()?,
    };
    ingest_grid(grid, name, spec)
}

/// Ingest one sheet's grid.
///
/// Every non-blank row below the header becomes one row with exactly the
/// schema's columns. Canonical columns without a matching header are null,
/// and a row whose content sits only in unmapped columns is kept all-null.
pub fn ingest_grid(grid: &Grid, sheet: &str, spec: &IngestSpec) -> IngestResult<Vec<Row>> {
    let header_idx = find_header_row(grid, &spec.marker, spec.scan_limit).ok_or_else(|| {
        IngestError::HeaderNotFound {
            marker: spec.marker.clone(),
            sheet: sheet.to_string(),
            scan_limit: spec.scan_limit,
        }
    })?;
    let header = grid.row(header_idx).unwrap_or_default();
    let mapping = map_columns(header, &spec.schema, spec.matching);

    let unmapped: Vec<&str> = spec
        .schema
        .columns
        .iter()
        .zip(&mapping)
        .filter(|(_, idx)| idx.is_none())
        .map(|(col, _)| col.name.as_str())
        .collect();
    if !unmapped.is_empty() {
        log::warn!(
            "Sheet '{}': no header for {} column(s), values will be null: {}",
            sheet,
            unmapped.len(),
            unmapped.join(", ")
        );
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for cells in grid.rows().skip(header_idx + 1) {
        // blank means blank across the whole sheet row, mapped or not
        if cells.iter().all(CellValue::is_blank) {
            skipped += 1;
            continue;
        }
        let raw: Row = spec
            .schema
            .columns
            .iter()
            .zip(&mapping)
            .map(|(col, idx)| {
                let value = idx
                    .and_then(|i| cells.get(i))
                    .cloned()
                    .unwrap_or_default();
                (col.name.clone(), value)
            })
            .collect();
        rows.push(clean_row(&raw, &spec.schema));
    }

    log::debug!(
        "Sheet '{}': header at row {}, {} data row(s), {} blank row(s) skipped",
        sheet,
        header_idx + 1,
        rows.len(),
        skipped
    );
    Ok(rows)
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
