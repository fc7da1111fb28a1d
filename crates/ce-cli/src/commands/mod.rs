//! CLI command implementations

pub(crate) mod actual_cost;
pub(crate) mod budget;
pub(crate) mod common;
pub(crate) mod dn_master;
pub(crate) mod draft;
pub(crate) mod init;
pub(crate) mod po;
pub(crate) mod process;
pub(crate) mod reconcile;
