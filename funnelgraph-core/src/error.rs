//! Error types for funnelgraph-core

use thiserror::Error;

/// Main error type for the funnelgraph-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error for a raw log line
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV table error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Log collection error
    #[error("collector error: {0}")]
    Collector(String),
}

/// Result type alias for funnelgraph-core
pub type Result<T> = std::result::Result<T, Error>;
