//! Error types for ce-ingest

use ce_core::CoreError;
use thiserror::Error;

/// Spreadsheet ingestion errors
#[derive(Error, Debug)]
pub enum IngestError {
    /// I001: The bytes are not a readable workbook
    #[error("[I001] Failed to open workbook: {0}")]
    Workbook(String),

    /// I002: Requested sheet is missing
    #[error("[I002] Sheet '{sheet}' not found. Available sheets: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// I003: No header row within the scan window
    #[error("[I003] Header '{marker}' not found in the first {scan_limit} rows of sheet '{sheet}'")]
    HeaderNotFound {
        marker: String,
        sheet: String,
        scan_limit: usize,
    },

    /// I004: Workbook has no sheets at all
    #[error("[I004] Workbook contains no sheets")]
    EmptyWorkbook,

    /// I005: Writing a workbook failed
    #[error("[I005] Failed to write workbook: {0}")]
    Export(String),

    /// Core error passthrough
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        IngestError::Workbook(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for IngestError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        IngestError::Export(err.to_string())
    }
}

/// Result type alias for IngestError
pub type IngestResult<T> = Result<T, IngestError>;
