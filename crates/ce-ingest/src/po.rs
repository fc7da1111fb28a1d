//! Purchase-order workbook: site id listing and per-site lookup.

use crate::error::IngestResult;
use crate::ingest::{ingest_workbook, IngestSpec};
use crate::workbook::{read_workbook, Workbook};
use ce_core::schema::po;
use ce_core::{CellValue, FieldSet, Row, Source};

/// Category spelling used in PO workbooks for standalone LMC routes.
const FIBMAX: &str = "fibmax";
const STANDALONE_CATEGORY: &str = "LMC (Standalone)";

/// The `684 POP` sheet of a PO workbook, read into canonical rows.
#[derive(Debug, Clone)]
pub struct PoWorkbook {
    rows: Vec<Row>,
}

impl PoWorkbook {
    /// Read the PO sheet from workbook bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> IngestResult<Self> {
        Self::from_workbook(&read_workbook(bytes)?)
    }

    pub fn from_workbook(workbook: &Workbook) -> IngestResult<Self> {
        // table name is irrelevant for reading
        let rows = ingest_workbook(workbook, &IngestSpec::po_master("po_master"))?;
        Ok(Self { rows })
    }

    /// Canonical PO rows, for upload to the PO master table.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Distinct non-blank site ids in sheet order.
    pub fn site_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.get(po::SITE_ID).and_then(CellValue::as_text))
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    /// PO fields for a site, matched case-insensitively.
    ///
    /// Unknown sites yield every field blank except `SiteID`, which echoes
    /// the requested id.
    pub fn lookup(&self, site_id: &str) -> FieldSet {
        let wanted = site_id.trim().to_lowercase();
        let found = self.rows.iter().find(|r| {
            r.get(po::SITE_ID)
                .and_then(CellValue::as_text)
                .is_some_and(|id| id.to_lowercase() == wanted)
        });
        if found.is_none() {
            log::debug!("Site '{}' not present in PO sheet", site_id.trim());
        }

        let field = |col: &str| -> CellValue {
            let value = found.map(|r| r.value(col)).unwrap_or_default();
            match value {
                CellValue::Text(s) if s.trim() == "-" => CellValue::Null,
                other => other,
            }
        };
        let category = match field(po::CATEGORY) {
            CellValue::Text(s) if s.trim().eq_ignore_ascii_case(FIBMAX) => {
                CellValue::text(STANDALONE_CATEGORY)
            }
            other => other,
        };

        let fields = Row::new()
            .with(po::PO_NO, field(po::PO_NO))
            .with(po::PO_LENGTH, field(po::PO_LENGTH))
            .with(po::CATEGORY, category)
            .with(po::SITE_ID, site_id.trim())
            .with(po::UID, field(po::UID))
            .with(po::PARENT_ROUTE, field(po::PARENT_ROUTE));
        FieldSet::new(Source::Po, fields)
    }
}
