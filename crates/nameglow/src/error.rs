//! Caller-visible errors.
//!
//! Model-call failures never show up here: the virtue and nickname sources
//! recover from them locally. What remains is bad input, configuration
//! problems, and history writes that did not make it to disk.

use thiserror::Error;

/// Errors returned by `nameglow` operations.
#[derive(Debug, Error)]
pub enum NameGlowError {
    /// The supplied name cannot be turned into letters to work with.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// File I/O error (history or catalog files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration or catalog data is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The API client could not be constructed.
    #[error("API client error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, NameGlowError>;
