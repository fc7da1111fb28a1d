//! The reconciliation table: one resolved value per DN master field.

use crate::error::{ReconcileError, ReconcileResult};
use crate::fields::{OutputField, Resolution};
use crate::merge::MergedFields;
use crate::metrics::DerivedMetrics;
use ce_core::schema::dn_master;
use ce_core::{CellValue, ConstantsConfig, Row, Source, TableSchema};
use serde_json::json;

/// A value supplied by the user for one output field.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub field: OutputField,
    pub value: CellValue,
}

/// Parse `field=value` arguments.
///
/// Only manual and blank fields may be overridden unless `force` is set.
/// An empty value clears the field.
pub fn parse_overrides(args: &[String], force: bool) -> ReconcileResult<Vec<Override>> {
    args.iter()
        .map(|arg| {
            let (name, value) = arg
                .split_once('=')
                .ok_or_else(|| ReconcileError::InvalidOverride(arg.clone()))?;
            let field: OutputField = name.parse()?;
            let resolution = field.resolution();
            if !force && !field.is_manual() && resolution != Resolution::Blank {
                return Err(ReconcileError::NotEditable {
                    field: field.name().to_string(),
                    source_label: resolution.source().label().to_string(),
                });
            }
            let value = value.trim();
            Ok(Override {
                field,
                value: if value.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::text(value)
                },
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub field: OutputField,
    pub value: CellValue,
    pub source: Source,
    pub edited: bool,
}

impl TableRow {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "field": self.field.name(),
            "value": self.value,
            "source": self.source.label(),
            "edited": self.edited,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationTable {
    rows: Vec<TableRow>,
}

impl ReconciliationTable {
    /// Resolve every output field.
    ///
    /// Order: override, hardcoded constant, calculated metric, mapped parser
    /// field, blank. The last override for a field wins.
    pub fn build(
        merged: &MergedFields,
        metrics: &DerivedMetrics,
        constants: &ConstantsConfig,
        overrides: &[Override],
    ) -> Self {
        let rows = OutputField::ALL
            .iter()
            .map(|&field| {
                let resolution = field.resolution();
                if let Some(o) = overrides.iter().rev().find(|o| o.field == field) {
                    return TableRow {
                        field,
                        value: o.value.clone(),
                        source: resolution.source(),
                        edited: true,
                    };
                }
                let value = match resolution {
                    Resolution::Hardcoded(constant) => CellValue::text(constant.value(constants)),
                    Resolution::Calculated(metric) => metrics.value(metric),
                    Resolution::Mapped { label, source } => merged
                        .mapped(label, source)
                        .map(|f| f.value.clone())
                        .unwrap_or_default(),
                    Resolution::Blank => CellValue::Null,
                };
                TableRow {
                    field,
                    value,
                    source: resolution.source(),
                    edited: false,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn get(&self, field: OutputField) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.field == field)
    }

    pub fn value(&self, field: OutputField) -> CellValue {
        self.get(field).map(|r| r.value.clone()).unwrap_or_default()
    }

    /// The table as a DN master row, normalized like an ingested master row.
    ///
    /// Fails when the DN number is blank, since the master is keyed on it.
    pub fn to_master_row(&self) -> ReconcileResult<Row> {
        let schema = TableSchema::dn_master(String::new());
        let row: Row = self
            .rows
            .iter()
            .map(|r| {
                let name = r.field.name();
                let value = match schema.column(name) {
                    Some(col) => col.kind.coerce(r.value.clone()),
                    None => r.value.clone(),
                };
                (name.to_string(), value)
            })
            .collect();
        if row.value(dn_master::DN_NUMBER).is_blank() {
            return Err(ReconcileError::MissingDnNumber);
        }
        Ok(row)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.rows.iter().map(TableRow::to_json).collect())
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
