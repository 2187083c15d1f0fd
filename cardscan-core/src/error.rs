//! Error types for cardscan

use thiserror::Error;

/// Hard failures. Rejected rows and empty pages are not errors; they are
/// absorbed by the parser and show up as missing transactions.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("text recognition failed on page {page}: {message}")]
    Recognition { page: usize, message: String },

    #[error("invalid OCR observation: {0}")]
    InvalidObservation(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
