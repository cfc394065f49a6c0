//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(table = "users", "Anonymizing table");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log write progress for a table
///
/// # Example
///
/// ```no_run
/// use veil::log_write_progress;
///
/// log_write_progress!("users", 100, 1000);
/// ```
#[macro_export]
macro_rules! log_write_progress {
    ($table:expr, $written:expr, $total:expr) => {
        tracing::info!(
            table = %$table,
            written = $written,
            total = $total,
            progress_pct = ($written as f64 / ($total as f64).max(1.0) * 100.0).round(),
            "Chunk written"
        );
    };
}
