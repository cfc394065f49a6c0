//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod run;
pub mod seed;
pub mod validate;

use crate::domain::VeilError;

/// Exit code: success
pub const EXIT_OK: i32 = 0;
/// Exit code: at least one table failed
pub const EXIT_TABLE_FAILED: i32 = 1;
/// Exit code: configuration error
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: database unreachable or connection lost
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code: fatal error
pub const EXIT_FATAL: i32 = 5;

/// Map an error that ended a command to its exit code
pub fn exit_code_for(err: &VeilError) -> i32 {
    match err {
        VeilError::Configuration(_) => EXIT_CONFIG,
        VeilError::Connection(_) => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}
