//! Canonical rows back to an xlsx workbook.
//!
//! Headers use each column's first human alias when it has one, so an
//! exported workbook reads back with the same [`IngestSpec`].

use crate::error::IngestResult;
use crate::ingest::IngestSpec;
use ce_core::{CellValue, ColumnSpec, Row};
use rust_xlsxwriter::{Format, Workbook};

fn header_label(col: &ColumnSpec) -> &str {
    col.aliases.first().map(String::as_str).unwrap_or(&col.name)
}

/// Write `rows` as a single-sheet workbook laid out for `spec`.
pub fn export_rows(spec: &IngestSpec, rows: &[Row]) -> IngestResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(spec.sheet.as_deref().unwrap_or(&spec.schema.table))?;

    let bold = Format::new().set_bold();
    for (c, col) in spec.schema.columns.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, header_label(col), &bold)?;
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (c, col) in spec.schema.columns.iter().enumerate() {
            let c = c as u16;
            match row.value(&col.name) {
                CellValue::Null => {}
                CellValue::Number(n) => {
                    sheet.write_number(r, c, n)?;
                }
                CellValue::Text(s) => {
                    sheet.write_string(r, c, s)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c, b)?;
                }
            }
        }
    }
    sheet.set_freeze_panes(1, 0)?;

    log::debug!(
        "Exported {} row(s) of {} to xlsx",
        rows.len(),
        spec.schema.table
    );
    Ok(workbook.save_to_buffer()?)
}
