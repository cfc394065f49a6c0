//! Database client factory
//!
//! This module creates the database client matching the configured dialect.

use crate::adapters::database::traits::DatabaseClient;
use crate::adapters::mysql::MySqlClient;
use crate::adapters::postgresql::PostgreSQLClient;
use crate::config::{DatabaseConfig, Dialect};
use crate::domain::Result;

/// Open a single connection to the configured database
///
/// # Errors
///
/// Returns [`VeilError::Connection`](crate::domain::VeilError::Connection)
/// if the server cannot be reached or rejects the credentials.
pub async fn connect(config: &DatabaseConfig) -> Result<Box<dyn DatabaseClient>> {
    tracing::info!(target_db = %config.display_target(), "Connecting to database");

    match config.dialect {
        Dialect::Postgres => {
            let client = PostgreSQLClient::connect(config).await?;
            Ok(Box::new(client))
        }
        Dialect::MySql => {
            let client = MySqlClient::connect(config).await?;
            Ok(Box::new(client))
        }
    }
}
