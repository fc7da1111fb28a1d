//! Canonical table schemas for the budget, DN master and PO master tables.
//!
//! Column names are the persisted names. The budget columns keep the exact
//! spelling of the LMC master workbook (including its double spaces), so the
//! same name is used for header matching and for the stored column.

use crate::error::{CoreError, CoreResult};
use crate::value::{excel_serial_to_date, parse_date, round2, CellValue};
use serde::Serialize;

/// How a column's values are normalized before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Free text
    Text,
    /// Numeric, rounded to two decimals
    Number,
    /// Calendar date, stored as `YYYY-MM-DD`
    Date,
}

impl ColumnKind {
    /// Normalize a raw value for this column kind.
    ///
    /// - Blank values (null or whitespace-only text) become `Null`.
    /// - `Number`: numbers and numeric text are rounded to two decimals;
    ///   anything else becomes `Null` with a warning.
    /// - `Text`: numbers are rendered without a trailing `.0`; text is trimmed.
    /// - `Date`: Excel serials and recognised date strings become ISO dates;
    ///   anything else is kept as trimmed text.
    pub fn coerce(self, value: CellValue) -> CellValue {
        if value.is_blank() {
            return CellValue::Null;
        }
        match (self, value) {
            (ColumnKind::Number, CellValue::Number(n)) => CellValue::Number(round2(n)),
            (ColumnKind::Number, CellValue::Text(s)) => match crate::value::parse_number(&s) {
                Some(n) => CellValue::Number(round2(n)),
                None => {
                    log::warn!("Non-numeric value '{}' in a numeric column, storing null", s.trim());
                    CellValue::Null
                }
            },
            (ColumnKind::Number, CellValue::Bool(b)) => {
                log::warn!("Boolean {} in a numeric column, storing null", b);
                CellValue::Null
            }
            (ColumnKind::Text, CellValue::Text(s)) => CellValue::Text(s.trim().to_string()),
            (ColumnKind::Text, CellValue::Number(n)) => CellValue::Text(n.to_string()),
            (ColumnKind::Date, CellValue::Number(n)) => match excel_serial_to_date(n) {
                Some(d) => CellValue::Text(d.format("%Y-%m-%d").to_string()),
                None => CellValue::Number(n),
            },
            (ColumnKind::Date, CellValue::Text(s)) => match parse_date(&s) {
                Some(d) => CellValue::Text(d.format("%Y-%m-%d").to_string()),
                None => {
                    log::warn!("Unrecognised date '{}', keeping text", s.trim());
                    CellValue::Text(s.trim().to_string())
                }
            },
            (_, other) => other,
        }
    }

    /// SQL column type used when a backend creates the table.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Text | ColumnKind::Date => "VARCHAR",
            ColumnKind::Number => "DOUBLE",
        }
    }
}

/// One canonical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    /// Persisted column name
    pub name: String,
    /// Value normalization
    pub kind: ColumnKind,
    /// Additional spreadsheet header spellings that map onto this column
    pub aliases: Vec<String>,
}

impl ColumnSpec {
    /// Column with no aliases.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            aliases: Vec::new(),
        }
    }

    /// Builder: add header aliases.
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// A persisted table: name, business key, ordered canonical columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    /// Table name in the store
    pub table: String,
    /// Business key column (unique within the table)
    pub key: String,
    /// Canonical columns in output order
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Look up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Ordered column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Fail unless every requested column belongs to this table.
    pub fn check_columns<S: AsRef<str>>(&self, columns: &[S]) -> CoreResult<()> {
        for col in columns {
            if self.column(col.as_ref()).is_none() {
                return Err(CoreError::UnknownColumn {
                    table: self.table.clone(),
                    column: col.as_ref().to_string(),
                });
            }
        }
        Ok(())
    }

    /// LMC budget table keyed by `SiteID`.
    pub fn budget(table: impl Into<String>) -> Self {
        use ColumnKind::*;
        Self {
            table: table.into(),
            key: budget::SITE_ID.to_string(),
            columns: vec![
                ColumnSpec::new(budget::SITE_ID, Text),
                ColumnSpec::new(budget::LENGTH, Number),
                ColumnSpec::new(budget::RI_COST_PER_METER, Number),
                ColumnSpec::new(budget::MATERIAL_COST_PER_METER, Number),
                ColumnSpec::new(budget::BUILD_COST_PER_METER, Number),
                ColumnSpec::new(budget::TOTAL_RI_AMOUNT, Number),
                ColumnSpec::new(budget::MATERIAL_COST, Number),
                ColumnSpec::new(budget::EXECUTION_COST, Number),
                ColumnSpec::new(budget::TOTAL_COST, Number),
                ColumnSpec::new(budget::ROUTE_TYPE, Text),
            ],
        }
    }

    /// DN master table keyed by `dn_number`.
    pub fn dn_master(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key: dn_master::DN_NUMBER.to_string(),
            columns: dn_master::columns(),
        }
    }

    /// PO master table keyed by `SiteID`.
    pub fn po_master(table: impl Into<String>) -> Self {
        use ColumnKind::*;
        Self {
            table: table.into(),
            key: po::SITE_ID.to_string(),
            columns: vec![
                ColumnSpec::new(po::SITE_ID, Text).with_aliases(&["Site ID"]),
                ColumnSpec::new(po::PO_NO, Text).with_aliases(&["PO Number"]),
                ColumnSpec::new(po::PO_LENGTH, Number).with_aliases(&["PO Length"]),
                ColumnSpec::new(po::CATEGORY, Text).with_aliases(&["Categaory"]),
                ColumnSpec::new(po::UID, Text),
                ColumnSpec::new(po::PARENT_ROUTE, Text).with_aliases(&["Parent Route Name/HH"]),
            ],
        }
    }
}

/// Budget (LMC master) column names.
pub mod budget {
    pub const SITE_ID: &str = "SiteID";
    pub const LENGTH: &str = "CE-Length-Mtr";
    pub const RI_COST_PER_METER: &str = "RI Cost per Meter";
    pub const MATERIAL_COST_PER_METER: &str = "Material  Cost Per Meter";
    pub const BUILD_COST_PER_METER: &str = "Build Cost Per Meter";
    pub const TOTAL_RI_AMOUNT: &str = "Total RI Amount";
    pub const MATERIAL_COST: &str = "Material Cost";
    pub const EXECUTION_COST: &str = "Execution Cost  including HH";
    pub const TOTAL_COST: &str = "Total Cost (Without Deposit)";
    pub const ROUTE_TYPE: &str = "Route Type";

    /// Columns returned by a default budget query.
    pub const QUERY_COLUMNS: &[&str] = &[TOTAL_RI_AMOUNT, MATERIAL_COST, EXECUTION_COST, TOTAL_COST];
}

/// PO workbook field labels, as returned by the PO parser.
pub mod po {
    pub const SITE_ID: &str = "SiteID";
    pub const PO_NO: &str = "PO No";
    pub const PO_LENGTH: &str = "PO Length (Mtr)";
    pub const CATEGORY: &str = "Category";
    pub const UID: &str = "UID";
    pub const PARENT_ROUTE: &str = "Parent Route Name / HH";
}

/// DN master column names.
pub mod dn_master {
    use super::{ColumnKind, ColumnSpec};

    pub const DN_NUMBER: &str = "dn_number";
    pub const SITE_ID: &str = "route_id / site_id";

    /// Date columns of the DN master.
    pub const DATE_COLUMNS: &[&str] = &[
        "application_date",
        "dn_received_date",
        "internal_approval_start",
        "internal_approval_end",
        "ticket_raised_date",
        "dn_payment_date",
        "civil_completion_date",
    ];

    const NUMBER_COLUMNS: &[&str] = &[
        "po_length",
        "application_length_mtr",
        "dn_length_mtr",
        "ot_length",
        "hdd_length",
        "no_of_pits",
        "pit_ri_rate",
        "ri_rate_go_rs",
        "dn_ri_amount",
        "multiplying_factor",
        "ground_rent",
        "administrative_charge",
        "supervision_charges",
        "chamber_fee",
        "gst",
        "ri_budget_amount_per_meter",
        "projected_budget_ri_amount_dn",
        "actual_total_non_refundable",
        "non_refundable_amount_per_mtr",
        "non_refundable_savings_per_mtr",
        "deposit",
        "total_dn_amount",
        "tat_days",
    ];

    /// Every DN master column in display order.
    pub const COLUMN_NAMES: &[&str] = &[
        "sr_no",
        "route_type",
        "lmc_route",
        "ip1_co_built",
        "dn_recipient",
        "project_name",
        "route_id / site_id",
        "uid",
        "contract_type",
        "build_type",
        "category_type",
        "survey_id",
        "po_number",
        "po_length",
        "parent_route",
        "ce_route_lmc_id",
        "route_lmc_section_id",
        "route_lmc_subsection_id",
        "application_number",
        "application_length_mtr",
        "application_date",
        "from_location",
        "to_location",
        "authority",
        "ward",
        "dn_number",
        "dn_length_mtr",
        "dn_received_date",
        "trench_type",
        "ot_length",
        "hdd_length",
        "no_of_pits",
        "pit_ri_rate",
        "surface",
        "ri_rate_go_rs",
        "dn_ri_amount",
        "multiplying_factor",
        "ground_rent",
        "administrative_charge",
        "supervision_charges",
        "chamber_fee",
        "gst",
        "ri_budget_amount_per_meter",
        "projected_budget_ri_amount_dn",
        "actual_total_non_refundable",
        "non_refundable_amount_per_mtr",
        "non_refundable_savings_per_mtr",
        "deposit",
        "total_dn_amount",
        "new_revised_dn_number",
        "new_revised_dn_against",
        "internal_approval_start",
        "internal_approval_end",
        "ticket_raised_date",
        "dn_payment_date",
        "tat_days",
        "civil_completion_date",
    ];

    /// Human header spellings seen in the DN master workbook.
    const ALIASES: &[(&str, &[&str])] = &[
        ("sr_no", &["Sr. No.", "Sr No"]),
        ("route_id / site_id", &["Route ID / Site ID", "SiteID", "Site ID"]),
        ("dn_number", &["Demand Note Reference number", "DN No"]),
        ("dn_length_mtr", &["DN Length (Mtr)", "Section Length"]),
        ("dn_received_date", &["Demand Note Date", "DN Received Date"]),
        ("application_number", &["Application Number"]),
        ("application_date", &["Application Date"]),
        ("po_number", &["PO No"]),
        ("po_length", &["PO Length (Mtr)"]),
        ("deposit", &["SD Amount"]),
        ("gst", &["GST Amount"]),
    ];

    pub(super) fn columns() -> Vec<ColumnSpec> {
        COLUMN_NAMES
            .iter()
            .map(|name| {
                let kind = if DATE_COLUMNS.contains(name) {
                    ColumnKind::Date
                } else if NUMBER_COLUMNS.contains(name) {
                    ColumnKind::Number
                } else {
                    ColumnKind::Text
                };
                let mut col = ColumnSpec::new(*name, kind).with_aliases(&[]);
                // snake_case names also match their spaced spelling ("dn_number" ~ "dn number")
                col.aliases.push(name.replace('_', " "));
                if let Some((_, aliases)) = ALIASES.iter().find(|(n, _)| n == name) {
                    col.aliases.extend(aliases.iter().map(|a| a.to_string()));
                }
                col
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
