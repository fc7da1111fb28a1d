//! Budgeted vs actual cost breakdown for a site.

use ce_core::{round2, BudgetRow};
use serde::Serialize;

/// RI, material and service cost of one side of the comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub ri: f64,
    pub material: f64,
    pub service: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        round2(self.ri + self.material + self.service)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    pub site_id: String,
    pub budget: CostBreakdown,
    pub actual: CostBreakdown,
}

impl BudgetComparison {
    /// Budget side from the site's budget row; missing amounts count as zero.
    pub fn new(budget: &BudgetRow, actual: CostBreakdown) -> Self {
        Self {
            site_id: budget.site_id.to_string(),
            budget: CostBreakdown {
                ri: budget.total_ri_amount.unwrap_or(0.0),
                material: budget.material_cost.unwrap_or(0.0),
                service: budget.execution_cost.unwrap_or(0.0),
            },
            actual,
        }
    }

    /// Actual minus budget; positive means over budget.
    pub fn variance(&self) -> f64 {
        round2(self.actual.total() - self.budget.total())
    }

    /// Variance as a percentage of the budget, `None` for a zero budget.
    pub fn variance_percent(&self) -> Option<f64> {
        let budget = self.budget.total();
        (budget != 0.0).then(|| round2(self.variance() / budget * 100.0))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "site_id": self.site_id,
            "budget": { "ri": self.budget.ri, "material": self.budget.material,
                        "service": self.budget.service, "total": self.budget.total() },
            "actual": { "ri": self.actual.ri, "material": self.actual.material,
                        "service": self.actual.service, "total": self.actual.total() },
            "variance": self.variance(),
            "variance_percent": self.variance_percent(),
        })
    }
}
