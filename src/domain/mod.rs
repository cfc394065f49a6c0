//! Domain models and types for Veil.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Cell values and rows** ([`SqlValue`], [`Row`]) shared by every database adapter
//! - **Table specifications** ([`TableAnonymizationSpec`], [`ColumnOperation`])
//! - **Error types** ([`VeilError`], [`TransformError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, VeilError>`]:
//!
//! ```rust
//! use veil::domain::{Result, SqlValue, VeilError};
//!
//! fn require_text(value: &SqlValue) -> Result<&str> {
//!     value
//!         .as_text()
//!         .ok_or_else(|| VeilError::Other(format!("expected text, got {}", value.kind())))
//! }
//! ```

pub mod errors;
pub mod result;
pub mod table;
pub mod value;

pub use errors::{TransformError, VeilError};
pub use result::Result;
pub use table::{ColumnOperation, TableAnonymizationSpec};
pub use value::{Row, SqlValue};
