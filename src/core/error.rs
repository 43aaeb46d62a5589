use rusqlite;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GurumeError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Malformed record data in {origin}: {detail}")]
    DataFormatError { origin: String, detail: String },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Similarity threshold must be within [0, 1], got {0}")]
    SimilarityConfigError(f64),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl GurumeError {
    pub(crate) fn data_format(origin: impl Into<String>, detail: impl Into<String>) -> Self {
        GurumeError::DataFormatError {
            origin: origin.into(),
            detail: detail.into(),
        }
    }
}
