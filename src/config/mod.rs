//! Configuration management for Veil.
//!
//! # Overview
//!
//! Veil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_*` environment overrides
//! - The bare `DATABASE_HOST`/`DATABASE_USER`/`DATABASE_PASSWORD`/`DATABASE_NAME`
//!   variables for credentials left out of the file
//! - Validation of every section, including each table specification
//!
//! # Example Configuration
//!
//! ```toml
//! [database]
//! dialect = "postgres"
//! host = "${DATABASE_HOST}"
//! user = "${DATABASE_USER}"
//! password = "${DATABASE_PASSWORD}"
//! name = "anony"
//!
//! [anonymization]
//! batch_size = 100
//!
//! [[tables]]
//! name = "users"
//! columns = [
//!   { column = "email", operation = "email" },
//!   { column = "password", operation = "password" },
//! ]
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//! for table in &config.tables {
//!     println!("{} ({} columns)", table.table_name, table.column_operations.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{ApplicationConfig, DatabaseConfig, Dialect, LoggingConfig, VeilConfig};
pub use secret::{secret_string, SecretString, SecretValue};
