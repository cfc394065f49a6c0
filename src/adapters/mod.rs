//! External system integrations for Veil.
//!
//! - [`database`] - Database abstraction layer (trait, factory, statement building)
//! - [`postgresql`] - PostgreSQL implementation over `tokio-postgres`
//! - [`mysql`] - MySQL / MariaDB implementation over `sqlx`
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate driver crates and
//! enable testing with in-memory implementations. The pipeline only ever
//! sees a `Box<dyn DatabaseClient>`:
//!
//! ```rust,no_run
//! use veil::adapters::database::connect;
//! use veil::config::{DatabaseConfig, Dialect};
//!
//! # async fn example() -> veil::domain::Result<()> {
//! let mut config = DatabaseConfig::new(Dialect::Postgres);
//! config.host = Some("localhost".to_string());
//! config.user = Some("veil".to_string());
//! config.name = Some("anony".to_string());
//!
//! let mut db = connect(&config).await?;
//! let rows = db.execute_query("SELECT 1 AS one", &[]).await?;
//! assert_eq!(rows.len(), 1);
//! db.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod mysql;
pub mod postgresql;
