//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the listing matcher. The matching algorithm
//! itself is total over any string input; errors only arise at the edges,
//! when records are malformed or when configuration and I/O fail.
//!
//! ## Input/Output Specification
//! - **Input**: error conditions from adapters and configuration
//! - **Output**: structured error types with context
//! - **Error Categories**: Ingestion, Configuration, I/O
//!
//! Ambiguous matches are never errors. The matcher reports "no unique match"
//! through its return value, and re-running with the same inputs always
//! yields the same result, so no error here is transient.

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, MatchError>;

/// Error types for the listing matcher
#[derive(Debug, Error)]
pub enum MatchError {
    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors outside the per-record path
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Configuration value validation errors
    #[error("validation failed for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// A catalog or listing record missing a required field or failing to
    /// parse. Aborts that record only, never the whole run.
    #[error("malformed record on line {line}: {details}")]
    MalformedRecord { line: usize, details: String },
}

impl MatchError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            MatchError::Io(_) | MatchError::Json(_) => "io",
            MatchError::Toml(_) | MatchError::Config { .. } | MatchError::Validation { .. } => {
                "configuration"
            }
            MatchError::MalformedRecord { .. } => "ingestion",
        }
    }
}
