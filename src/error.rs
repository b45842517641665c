//! Error types for flowdex.
//!
//! Generation treats most errors as per-file and recoverable (the file is
//! skipped); the query side treats a failed artifact load as terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for flowdex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// flowdex error types.
///
/// Each variant maps to a stable code, reported with skipped files.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Workflow(_) => "WORKFLOW_ERROR",
            Error::Parse(_) => "PARSE_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::Catalog(_) => "CATALOG_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Toml(_) => "TOML_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }

    /// Whether generation skips the offending file and keeps going instead
    /// of aborting.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::Parse(_) | Error::Workflow(_) | Error::Json(_) | Error::Io(_)
        )
    }
}

/// Serializable error record, used when reporting skipped files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        ErrorResponse::new(err.code(), &err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::Parse("x".into()).code(), "PARSE_ERROR");
        assert_eq!(Error::Catalog("x".into()).code(), "CATALOG_ERROR");
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.code(), "IO_ERROR");
    }

    #[test]
    fn test_per_file_errors() {
        assert!(Error::Parse("bad".into()).is_per_file());
        assert!(!Error::Storage("cannot create dir".into()).is_per_file());
        assert!(!Error::Catalog("missing".into()).is_per_file());
    }

    #[test]
    fn test_error_response_with_file() {
        let err = Error::Parse("unexpected token".into());
        let resp = ErrorResponse::from(&err).with_file("0_broken.json");
        assert_eq!(resp.code, "PARSE_ERROR");
        assert_eq!(resp.file.as_deref(), Some("0_broken.json"));
    }
}
