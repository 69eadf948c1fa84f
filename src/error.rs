//! Error types for registry validation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for registry checks
pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors that abort a check.
///
/// Per-link failures are not errors; they are recorded as
/// [`LinkFailure`](crate::reachability::LinkFailure) and aggregated.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid registry document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Schema does not compile: {0}")]
    InvalidSchema(String),

    #[error("Unsupported registry format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Duplicate package in registry: {0}")]
    DuplicatePackage(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
