//! Domain records: parse-result field sets, budget rows and demand notes.

use crate::error::CoreResult;
use crate::keys::{DnNumber, SiteId};
use crate::row::Row;
use crate::schema::budget;
use crate::value::{parse_date, per_meter, round2, CellValue};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a reconciliation value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "PO")]
    Po,
    #[serde(rename = "DN")]
    Dn,
    #[serde(rename = "DN Application")]
    Application,
    Hardcoded,
    Calculated,
    Blank,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::Po => "PO",
            Source::Dn => "DN",
            Source::Application => "DN Application",
            Source::Hardcoded => "Hardcoded",
            Source::Calculated => "Calculated",
            Source::Blank => "Blank",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase with all whitespace removed; used for lenient label matching.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One `(field, value, source)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationField {
    pub field: String,
    pub value: CellValue,
    pub source: Source,
}

/// A flat label -> value mapping returned by one parser, tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSet {
    pub source: Source,
    pub fields: Row,
}

impl FieldSet {
    pub fn new(source: Source, fields: Row) -> Self {
        Self { source, fields }
    }

    pub fn empty(source: Source) -> Self {
        Self::new(source, Row::new())
    }

    /// Value for a label: exact match first, then whitespace/case-insensitive.
    pub fn lookup(&self, label: &str) -> Option<&CellValue> {
        if let Some(v) = self.fields.get(label) {
            return Some(v);
        }
        let wanted = normalize_label(label);
        self.fields
            .iter()
            .find(|(k, _)| normalize_label(k) == wanted)
            .map(|(_, v)| v)
    }

    /// Numeric value for a label, `None` when missing or not numeric.
    pub fn number(&self, label: &str) -> Option<f64> {
        self.lookup(label).and_then(CellValue::as_f64)
    }

    /// Flatten into reconciliation triples.
    pub fn triples(&self) -> impl Iterator<Item = ReconciliationField> + '_ {
        self.fields.iter().map(|(k, v)| ReconciliationField {
            field: k.to_string(),
            value: v.clone(),
            source: self.source,
        })
    }
}

/// Labels produced by the DN parser.
pub mod dn_labels {
    pub const REFERENCE: &str = "Demand Note Reference number";
    pub const SECTION_LENGTH: &str = "Section Length";
    pub const DATE: &str = "Demand Note Date";
    pub const ROAD_TYPES: &str = "Road Types";
    pub const RATE: &str = "Rate in Rs";
    pub const RI_AMOUNT: &str = "RI Amount";
    pub const MULTIPLICATION_FACTOR: &str = "Multiplication Factor";
    pub const GROUND_RENT: &str = "Ground Rent";
    pub const ADMINISTRATIVE_CHARGE: &str = "Administrative Charge";
    pub const SUPERVISION_CHARGES: &str = "Supervision Charges";
    pub const CHAMBER_FEE: &str = "Chamber Fee";
    pub const GST_AMOUNT: &str = "GST Amount";
    pub const GST: &str = "GST";
    pub const SD_AMOUNT: &str = "SD Amount";
}

/// Labels produced by the DN application parser.
pub mod application_labels {
    pub const NUMBER: &str = "Application Number";
    pub const LENGTH: &str = "Application Length (Mtr)";
    pub const DATE: &str = "Application Date";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AUTHORITY: &str = "Authority";
    pub const WARD: &str = "Ward";
}

/// One row of the LMC budget table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRow {
    pub site_id: SiteId,
    pub length: Option<f64>,
    pub ri_cost_per_meter: Option<f64>,
    pub material_cost_per_meter: Option<f64>,
    pub build_cost_per_meter: Option<f64>,
    pub total_ri_amount: Option<f64>,
    pub material_cost: Option<f64>,
    pub execution_cost: Option<f64>,
    pub total_cost: Option<f64>,
    pub route_type: Option<String>,
}

impl BudgetRow {
    /// Read a budget row out of a store or ingestion row.
    ///
    /// Fails only when the `SiteID` is blank.
    pub fn from_row(row: &Row) -> CoreResult<Self> {
        let num = |col: &str| row.get(col).and_then(CellValue::as_f64);
        Ok(Self {
            site_id: SiteId::try_new(row.value(budget::SITE_ID).to_string())?,
            length: num(budget::LENGTH),
            ri_cost_per_meter: num(budget::RI_COST_PER_METER),
            material_cost_per_meter: num(budget::MATERIAL_COST_PER_METER),
            build_cost_per_meter: num(budget::BUILD_COST_PER_METER),
            total_ri_amount: num(budget::TOTAL_RI_AMOUNT),
            material_cost: num(budget::MATERIAL_COST),
            execution_cost: num(budget::EXECUTION_COST),
            total_cost: num(budget::TOTAL_COST),
            route_type: row.get(budget::ROUTE_TYPE).and_then(CellValue::as_text),
        })
    }

}

/// The cost-relevant content of one parsed demand note.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DemandNote {
    /// Reference number; parsers occasionally fail to extract it
    pub reference: Option<DnNumber>,
    pub section_length: Option<f64>,
    pub date: Option<NaiveDate>,
    pub ri_amount: Option<f64>,
    pub ground_rent: Option<f64>,
    pub administrative_charge: Option<f64>,
    pub supervision_charges: Option<f64>,
    pub chamber_fee: Option<f64>,
    pub gst: Option<f64>,
    pub deposit: Option<f64>,
}

impl DemandNote {
    /// Pull the cost components out of a DN parser result.
    pub fn from_fields(dn: &FieldSet) -> Self {
        use dn_labels::*;
        Self {
            reference: dn
                .lookup(REFERENCE)
                .and_then(CellValue::as_text)
                .and_then(|s| DnNumber::try_new(s).ok()),
            section_length: dn.number(SECTION_LENGTH),
            date: dn
                .lookup(DATE)
                .and_then(CellValue::as_text)
                .and_then(|s| parse_date(&s)),
            ri_amount: dn.number(RI_AMOUNT),
            ground_rent: dn.number(GROUND_RENT),
            administrative_charge: dn.number(ADMINISTRATIVE_CHARGE),
            supervision_charges: dn.number(SUPERVISION_CHARGES),
            chamber_fee: dn.number(CHAMBER_FEE),
            gst: dn.number(GST_AMOUNT).or_else(|| dn.number(GST)),
            deposit: dn.number(SD_AMOUNT),
        }
    }

    /// Ground rent + administrative charge + RI amount + supervision charges.
    ///
    /// Missing components count as zero; `None` unless the sum is positive.
    pub fn non_refundable_total(&self) -> Option<f64> {
        positive_sum(&[
            self.ground_rent,
            self.administrative_charge,
            self.ri_amount,
            self.supervision_charges,
        ])
    }

    /// Non-refundable total per meter of section length.
    pub fn non_refundable_per_meter(&self) -> Option<f64> {
        per_meter(self.non_refundable_total()?, self.section_length?)
    }

    /// Every charge on the note including GST and the security deposit.
    pub fn total_amount(&self) -> Option<f64> {
        positive_sum(&[
            self.ri_amount,
            self.ground_rent,
            self.administrative_charge,
            self.supervision_charges,
            self.chamber_fee,
            self.gst,
            self.deposit,
        ])
    }
}

fn positive_sum(parts: &[Option<f64>]) -> Option<f64> {
    let sum: f64 = parts.iter().map(|p| p.unwrap_or(0.0)).sum();
    (sum > 0.0).then(|| round2(sum))
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
