//! Domain error types
//!
//! This module defines the error hierarchy for Veil. All errors are
//! domain-specific and don't expose third-party driver types.

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the application.
/// Whether an error ends a single table or the whole run is decided by
/// [`VeilError::is_fatal_for_run`].
#[derive(Debug, Error)]
pub enum VeilError {
    /// Invalid or incomplete configuration or table specification
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The database cannot be reached or the connection was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// A query failed
    #[error("Database error: {0}")]
    Database(String),

    /// A write failed mid-commit; the table's transaction was rolled back
    #[error("Commit failed for table '{table}' at row {row}: {message}")]
    Commit {
        table: String,
        row: usize,
        message: String,
    },

    /// A value could not be transformed
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// I/O errors (consent prompt, log directory)
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl VeilError {
    /// Returns `true` if the error must terminate the whole run rather than
    /// just the table being processed.
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, VeilError::Connection(_))
    }
}

/// Transform-specific errors
///
/// Raised by the transform registry while converting a single column value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// No transform is registered under this name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The operation cannot be applied to this kind of value
    #[error("Operation '{operation}' cannot transform a {kind} value")]
    UnsupportedValue { operation: String, kind: String },

    /// A date operation received text that is not a date
    #[error("Operation '{operation}' could not parse '{value}' as a date")]
    InvalidDate { operation: String, value: String },
}

impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Other(format!("Serialization error: {err}"))
    }
}
