// Veil - In-place PII anonymization for relational databases
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - In-place PII anonymization
//!
//! Veil anonymizes personally identifiable information stored in PostgreSQL
//! and MySQL tables, in place, driven by a TOML file that maps each table's
//! columns to a transformation (mask, hash, shuffle or date shift).
//!
//! ## Overview
//!
//! For every configured table Veil:
//! - **Plans** the column operations against the transform registry
//! - **Samples** one row and asks the operator to proceed
//! - **Scans** the whole table in primary-key order, page by page
//! - **Previews** the anonymized rows and asks for a final go-ahead
//! - **Commits** keyed UPDATEs inside a single transaction
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline, consent checkpoints and demo data seeding
//! - [`anonymization`] - Transform registry, value transforms and planning
//! - [`adapters`] - Database clients (PostgreSQL, MySQL) and SQL generation
//! - [`domain`] - Cell values, table specifications and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil::adapters::database::connect;
//! use veil::anonymization::TransformRegistry;
//! use veil::config::load_config;
//! use veil::core::consent::AutoApprove;
//! use veil::core::pipeline::{AnonymizationPipeline, RunContext, RunSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("veil.toml")?;
//!
//!     let ctx = RunContext {
//!         db: connect(&config.database).await?,
//!         registry: TransformRegistry::new(&config.anonymization),
//!         consent: Box::new(AutoApprove),
//!         settings: RunSettings::from_config(&config),
//!     };
//!
//!     let summary = AnonymizationPipeline::new(ctx).run(&config.tables).await?;
//!     println!("Updated {} rows", summary.rows_updated());
//!     Ok(())
//! }
//! ```
//!
//! ## Transforms
//!
//! Operations are looked up by name. Bare names pick a variant from the
//! `[anonymization]` section:
//!
//! ```rust
//! use veil::anonymization::{AnonymizationConfig, TransformRegistry};
//! use veil::domain::SqlValue;
//!
//! let registry = TransformRegistry::new(&AnonymizationConfig::default());
//! let masked = registry
//!     .apply("email", &SqlValue::from("john@example.com"))
//!     .unwrap();
//! assert_eq!(masked, SqlValue::from("j**n@example.com"));
//! ```
//!
//! ## Error Handling
//!
//! Veil uses the [`domain::VeilError`] type for all errors. Only a lost
//! connection ends a run; every other error fails the table it occurred on.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
