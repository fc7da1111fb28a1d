//! Workbook loading into in-memory cell grids.

use crate::error::{IngestError, IngestResult};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use ce_core::CellValue;
use std::io::Cursor;

/// A sheet's cells, addressed by absolute `(row, col)` position.
///
/// Rows above and columns left of the used range are padded with `Null` so
/// row indices match what a user sees in Excel (minus one).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn row(&self, idx: usize) -> Option<&[CellValue]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    fn from_range(range: &Range<Data>) -> Self {
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));
        let mut rows = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![CellValue::Null; col_offset];
            cells.extend(row.iter().map(cell_value));
            rows.push(cells);
        }
        Self { rows }
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // date cells keep their serial; date columns convert it later
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("Treating cell error {:?} as blank", e);
            CellValue::Null
        }
    }
}

/// Every sheet of a workbook, read eagerly.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<(String, Grid)>,
}

impl Workbook {
    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// A sheet by exact name.
    pub fn sheet(&self, name: &str) -> IngestResult<&Grid> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, g)| g)
            .ok_or_else(|| IngestError::SheetNotFound {
                sheet: name.to_string(),
                available: self.sheet_names().join(", "),
            })
    }

    /// The first sheet with its name.
    pub fn first_sheet(&self) -> IngestResult<(&str, &Grid)> {
        self.sheets
            .first()
            .map(|(n, g)| (n.as_str(), g))
            .ok_or(IngestError::EmptyWorkbook)
    }
}

/// Open an xlsx/xlsm/xlsb/xls/ods workbook held in memory.
pub fn read_workbook(bytes: Vec<u8>) -> IngestResult<Workbook> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        log::debug!(
            "Read sheet '{}' ({} rows x {} cols)",
            name,
            range.height(),
            range.width()
        );
        sheets.push((name, Grid::from_range(&range)));
    }
    if sheets.is_empty() {
        return Err(IngestError::EmptyWorkbook);
    }
    Ok(Workbook { sheets })
}
