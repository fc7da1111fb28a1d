//! Financial metrics derived from the DN parse result and the budget rate.

use crate::merge::MergedFields;
use ce_core::{round2, CellValue, DemandNote, Source};
use serde::Serialize;
use std::fmt;

/// A calculated DN master field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    RiBudgetAmountPerMeter,
    ProjectedBudgetRiAmountDn,
    ActualTotalNonRefundable,
    NonRefundableAmountPerMtr,
    NonRefundableSavingsPerMtr,
    TotalDnAmount,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::RiBudgetAmountPerMeter => "ri_budget_amount_per_meter",
            Metric::ProjectedBudgetRiAmountDn => "projected_budget_ri_amount_dn",
            Metric::ActualTotalNonRefundable => "actual_total_non_refundable",
            Metric::NonRefundableAmountPerMtr => "non_refundable_amount_per_mtr",
            Metric::NonRefundableSavingsPerMtr => "non_refundable_savings_per_mtr",
            Metric::TotalDnAmount => "total_dn_amount",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six calculated values of one analysis run, each rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub ri_budget_amount_per_meter: Option<f64>,
    pub projected_budget_ri_amount_dn: Option<f64>,
    pub actual_total_non_refundable: Option<f64>,
    pub non_refundable_amount_per_mtr: Option<f64>,
    pub non_refundable_savings_per_mtr: Option<f64>,
    pub total_dn_amount: Option<f64>,
}

impl DerivedMetrics {
    /// Derive the metrics from the DN fields of `merged`.
    ///
    /// `ri_cost_per_meter` is the budget table's `RI Cost per Meter` for the
    /// site, `None` when the site has no budget row.
    pub fn compute(merged: &MergedFields, ri_cost_per_meter: Option<f64>) -> Self {
        let note = DemandNote::from_fields(&merged.source_fields(Source::Dn));
        Self::from_note(&note, ri_cost_per_meter)
    }

    pub fn from_note(note: &DemandNote, ri_cost_per_meter: Option<f64>) -> Self {
        let rate = ri_cost_per_meter.filter(|r| r.is_finite());
        let per_mtr = note.non_refundable_per_meter();
        Self {
            ri_budget_amount_per_meter: rate.map(round2),
            projected_budget_ri_amount_dn: rate
                .zip(note.section_length)
                .map(|(r, len)| round2(r * len)),
            actual_total_non_refundable: note.non_refundable_total(),
            non_refundable_amount_per_mtr: per_mtr,
            non_refundable_savings_per_mtr: rate.zip(per_mtr).map(|(r, a)| round2(r - a)),
            total_dn_amount: note.total_amount(),
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::RiBudgetAmountPerMeter => self.ri_budget_amount_per_meter,
            Metric::ProjectedBudgetRiAmountDn => self.projected_budget_ri_amount_dn,
            Metric::ActualTotalNonRefundable => self.actual_total_non_refundable,
            Metric::NonRefundableAmountPerMtr => self.non_refundable_amount_per_mtr,
            Metric::NonRefundableSavingsPerMtr => self.non_refundable_savings_per_mtr,
            Metric::TotalDnAmount => self.total_dn_amount,
        }
    }

    pub fn value(&self, metric: Metric) -> CellValue {
        CellValue::from(self.get(metric))
    }
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;
