//! ce-db - Persistence layer for the DN ledger
//!
//! This crate provides the `Store` trait, the keyed sync operations built on
//! it, and implementations for DuckDB and PostgREST.

pub mod duckdb;
pub mod error;
pub mod rest;
pub mod sync;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use rest::RestBackend;
pub use sync::{dedupe_by_key, merge_keyed, replace_keyed, Deduped, SyncReport};
pub use traits::Store;
