//! ce-client - HTTP clients for the DN ledger
//!
//! Talks to the document parsing backend (PO/DN/application parsers, master
//! uploads and downloads, actual-cost extraction, per-authority output
//! workbooks) and creates mail drafts.

pub mod error;
mod http;
pub mod mail;
pub mod masters;
pub mod parse;
pub mod process;

pub use error::{ClientError, ClientResult};
pub use http::UploadFile;
pub use mail::MailClient;
pub use masters::{ActualCostResult, MasterKind};
pub use parse::{fields_from_json, parse_all, HttpParseClient, ParseRequest, ParseService};
pub use process::{filename_from_disposition, OutputFile, OutputKind, ALL_OUTPUTS_FILE_NAME};
