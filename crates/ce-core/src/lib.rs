//! ce-core - Core library for the DN ledger
//!
//! This crate provides shared cell/row types, business keys, canonical table
//! schemas, domain records and configuration parsing used across all ledger
//! components.

pub mod authority;
pub mod config;
pub mod error;
mod newtype_string;
pub mod keys;
pub mod model;
pub mod row;
pub mod schema;
pub mod value;

pub use authority::Authority;
pub use config::{Config, ConstantsConfig, EmailConfig, StoreConfig, StoreType};
pub use error::{CoreError, CoreResult};
pub use keys::{DnNumber, SiteId};
pub use model::{BudgetRow, DemandNote, FieldSet, ReconciliationField, Source};
pub use row::Row;
pub use schema::{ColumnKind, ColumnSpec, TableSchema};
pub use value::{per_meter, round2, CellValue};
