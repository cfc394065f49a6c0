//! Core business logic for Veil.
//!
//! # Modules
//!
//! - [`pipeline`] - Per-table scan, transform and commit orchestration
//! - [`consent`] - Previews and the operator checkpoints in front of every write
//! - [`seed`] - Demo data for test runs
//!
//! # Run Workflow
//!
//! 1. **Plan**: Resolve each `[[tables]]` entry against the transform registry
//! 2. **Sample**: Show one anonymized row and the row count, ask to proceed
//! 3. **Scan**: Read the table in primary-key order, one page at a time
//! 4. **Preview**: Show the first anonymized rows, ask to commit
//! 5. **Commit**: One transaction per table, rolled back on any failure
//! 6. **Report**: Log and print the run summary

pub mod consent;
pub mod pipeline;
pub mod seed;
