//! Column anonymization
//!
//! Value-level building blocks of the pipeline:
//! - **Transforms**: pure mask, shuffle, hash and date functions
//! - **Registry**: operation name to transform lookup, configured by strategy
//! - **Planner**: resolves a table specification into an [`AnonymizationPlan`]
//!
//! # Usage
//!
//! ```
//! use veil::anonymization::{plan, AnonymizationConfig, TransformRegistry};
//! use veil::domain::{SqlValue, TableAnonymizationSpec};
//!
//! let registry = TransformRegistry::new(&AnonymizationConfig::default());
//! let spec = TableAnonymizationSpec::new("users").with_column("password", "password");
//! let plan = plan(&spec, &registry).unwrap();
//!
//! for (_column, operation) in plan.column_operations() {
//!     let hashed = registry.apply(operation, &SqlValue::from("password123")).unwrap();
//!     assert_eq!(hashed, SqlValue::from("ef92b778ba"));
//! }
//! ```

pub mod config;
pub mod planner;
pub mod registry;
pub mod transforms;

pub use config::{AnonymizationConfig, AnonymizationStrategy, DateMode};
pub use planner::{plan, AnonymizationPlan};
pub use registry::TransformRegistry;
