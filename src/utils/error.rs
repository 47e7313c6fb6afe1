//! Error types for cb-index-exporter

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("HTTP {status} from {url}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("The output file {} already exists, use the --overwrite argument", .0.display())]
    OutputExists(PathBuf),

    #[error("No index records were produced, nothing to export")]
    EmptyResult,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    /// Classify a reqwest failure for a request to `url`
    pub fn from_request(err: reqwest::Error, url: &str, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ExportError::Timeout {
                url: url.to_string(),
                timeout_ms,
            }
        } else if err.is_decode() {
            ExportError::Parse(format!("invalid response body from {url}: {err}"))
        } else {
            ExportError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// True for the "endpoint absent on this server version" case
    pub fn is_endpoint_missing(&self) -> bool {
        matches!(self, ExportError::Http { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
