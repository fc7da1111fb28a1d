//! Error types for ce-client

use ce_core::CoreError;
use thiserror::Error;

/// Errors talking to the parsing service or the mail endpoint
#[derive(Error, Debug)]
pub enum ClientError {
    /// C001: Non-success HTTP status
    #[error("[C001] {url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// C002: The service answered with an error object
    #[error("[C002] Parsing service error: {0}")]
    Service(String),

    /// C003: Request could not be sent or its body not read
    #[error("[C003] Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// C004: Response did not have the expected shape
    #[error("[C004] Unexpected response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// C005: Local file could not be read for upload
    #[error("[C005] Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Core error passthrough
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for ClientError
pub type ClientResult<T> = Result<T, ClientError>;
