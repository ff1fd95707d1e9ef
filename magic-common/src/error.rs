use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum MagicError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Semantic Versioning Error: {0}")]
    SemVer(#[from] Arc<semver::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("Release not found: {0}")]
    ReleaseNotFound(String),

    #[error("Extraction Error: {0}")]
    ExtractionError(String),

    #[error("Checksum Error: {0}")]
    ChecksumError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Failed to execute command: {0}")]
    CommandExecError(String),

    #[error("Installation Error: {0}")]
    InstallError(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Aborted: {0}")]
    Aborted(String),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for MagicError {
    fn from(err: std::io::Error) -> Self {
        MagicError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for MagicError {
    fn from(err: reqwest::Error) -> Self {
        MagicError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for MagicError {
    fn from(err: serde_json::Error) -> Self {
        MagicError::Json(Arc::new(err))
    }
}

impl From<semver::Error> for MagicError {
    fn from(err: semver::Error) -> Self {
        MagicError::SemVer(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, MagicError>;
