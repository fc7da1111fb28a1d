//! Error types for ce-core

use thiserror::Error;

/// Core error type for the DN ledger
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Unknown municipal authority
    #[error("[E004] Unknown authority '{name}'. Known authorities: {known}")]
    UnknownAuthority { name: String, known: String },

    /// E005: A business key was empty
    #[error("[E005] {kind} must not be empty")]
    EmptyKey { kind: &'static str },

    /// E006: Unknown column for a table schema
    #[error("[E006] Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// E007: IO error
    #[error("[E007] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E008: IO error with file path context
    #[error("[E008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E009: YAML parse error
    #[error("[E009] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
