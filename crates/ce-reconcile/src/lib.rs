//! ce-reconcile - Multi-source reconciliation for the DN ledger
//!
//! Merges the PO, DN application and DN parse results, derives the
//! cost metrics, resolves every DN master field and composes the summary
//! email drafts.

pub mod comparison;
pub mod draft;
pub mod error;
pub mod fields;
pub mod merge;
pub mod metrics;
pub mod table;

pub use comparison::{BudgetComparison, CostBreakdown};
pub use draft::{parse_recipients, DraftSummary, EmailDraft};
pub use error::{ReconcileError, ReconcileResult};
pub use fields::{Constant, OutputField, Resolution};
pub use merge::MergedFields;
pub use metrics::{DerivedMetrics, Metric};
pub use table::{parse_overrides, Override, ReconciliationTable, TableRow};
