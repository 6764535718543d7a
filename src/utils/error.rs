//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Aggregation itself never fails; only the input and output boundaries do.

use thiserror::Error;

/// Errors that can occur while loading a trace
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read trace file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
