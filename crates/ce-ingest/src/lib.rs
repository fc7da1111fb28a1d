//! ce-ingest - Spreadsheet ingestion for the DN ledger
//!
//! Reads budget, DN master and PO workbooks, locates the header row by a
//! marker cell, maps headers onto canonical columns and cleans values.

pub mod clean;
pub mod error;
pub mod export;
pub mod header;
pub mod ingest;
pub mod po;
pub mod workbook;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use clean::clean_row;
pub use error::{IngestError, IngestResult};
pub use export::export_rows;
pub use header::{find_header_row, HeaderMatch, HEADER_SCAN_LIMIT};
pub use ingest::{ingest, ingest_workbook, IngestSpec, PO_SHEET};
pub use po::PoWorkbook;
pub use workbook::{read_workbook, Grid, Workbook};
