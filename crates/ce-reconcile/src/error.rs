//! Error types for ce-reconcile

use ce_core::CoreError;
use thiserror::Error;

/// Reconciliation errors
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// R001: Field name is not a DN master output field
    #[error("[R001] Unknown output field '{0}'")]
    UnknownField(String),

    /// R002: Override targets a field that is filled from a document or rule
    #[error("[R002] Field '{field}' is resolved from {source_label}; pass --force to override it")]
    NotEditable { field: String, source_label: String },

    /// R003: Override argument is not `field=value`
    #[error("[R003] Invalid override '{0}', expected field=value")]
    InvalidOverride(String),

    /// R004: The reconciled row has no DN number, so it cannot be keyed
    #[error("[R004] Reconciled row has no dn_number")]
    MissingDnNumber,

    /// R005: Email draft has no usable recipient
    #[error("[R005] Please enter at least one valid recipient in the To field")]
    NoRecipients,

    /// Core error passthrough
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for ReconcileError
pub type ReconcileResult<T> = Result<T, ReconcileError>;
