//! Error types for gazette

use thiserror::Error;

/// Error type for gazette operations
#[derive(Debug, Error)]
pub enum GazetteError {
    /// Outbound HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP protocol error while serving
    #[error("HTTP server error: {0}")]
    Hyper(#[from] hyper::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown recap section requested
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GazetteError>;
