//! In-memory xlsx fixtures for tests.

use rust_xlsxwriter::Workbook;

/// One fixture cell.
#[derive(Clone, Copy)]
pub(crate) enum Cell<'a> {
    S(&'a str),
    N(f64),
    E,
}

/// Build an xlsx workbook from `(sheet name, rows)` pairs.
pub(crate) fn xlsx(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::S(s) => {
                        sheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    Cell::N(n) => {
                        sheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    Cell::E => {}
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Shorthand for a row of text cells.
pub(crate) fn texts<'a>(cells: &[&'a str]) -> Vec<Cell<'a>> {
    cells.iter().map(|s| Cell::S(*s)).collect()
}
