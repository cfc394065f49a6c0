//! MySQL client implementation
//!
//! This module provides the [`DatabaseClient`] for MySQL and MariaDB over a
//! single `sqlx` connection.

use crate::adapters::database::DatabaseClient;
use crate::config::{DatabaseConfig, Dialect};
use crate::domain::{Result, Row, SqlValue, VeilError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlRow, MySqlSslMode};
use sqlx::query::Query;
use sqlx::{Column, ConnectOptions, Connection, MySql, MySqlConnection, Row as _, TypeInfo};
use std::time::Duration;

/// MySQL client for Veil
pub struct MySqlClient {
    conn: MySqlConnection,
}

fn map_sqlx_error(context: &str, err: sqlx::Error) -> VeilError {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::WorkerCrashed => {
            VeilError::Connection(format!("{context}: {err}"))
        }
        other => VeilError::Database(format!("{context}: {other}")),
    }
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &SqlValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Int(n) => query.bind(*n),
        SqlValue::Float(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Date(d) => query.bind(*d),
        SqlValue::Timestamp(ts) => query.bind(*ts),
    }
}

fn decode_column(row: &MySqlRow, idx: usize) -> std::result::Result<SqlValue, sqlx::Error> {
    let type_name = row.columns()[idx].type_info().name().to_ascii_uppercase();

    let value = match type_name.as_str() {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(idx)?.map(SqlValue::Bool),
        t if t.contains("INT") && t.ends_with("UNSIGNED") => row
            .try_get::<Option<u64>, _>(idx)?
            .map(|n| i64::try_from(n).map_or_else(|_| SqlValue::Text(n.to_string()), SqlValue::Int)),
        t if t.contains("INT") => row.try_get::<Option<i64>, _>(idx)?.map(SqlValue::Int),
        "FLOAT" => row
            .try_get::<Option<f32>, _>(idx)?
            .map(|f| SqlValue::Float(f.into())),
        "DOUBLE" => row.try_get::<Option<f64>, _>(idx)?.map(SqlValue::Float),
        "DATE" => row.try_get::<Option<NaiveDate>, _>(idx)?.map(SqlValue::Date),
        "DATETIME" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(SqlValue::Timestamp),
        "TIMESTAMP" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|ts| SqlValue::Timestamp(ts.naive_utc())),
        // DECIMAL arrives as its decimal text in both protocols
        t if t.starts_with("DECIMAL") => row
            .try_get_unchecked::<Option<String>, _>(idx)?
            .map(SqlValue::Text),
        _ => row.try_get::<Option<String>, _>(idx)?.map(SqlValue::Text),
    };

    Ok(value.unwrap_or(SqlValue::Null))
}

fn from_mysql_row(row: &MySqlRow) -> Result<Row> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, idx).map_err(|e| {
            VeilError::Database(format!("Failed to decode column '{}': {e}", column.name()))
        })?;
        out.push(column.name(), value);
    }
    Ok(out)
}

impl MySqlClient {
    /// Connect to the configured server
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Connection`] if the server cannot be reached.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let ssl_mode = match config.ssl_mode.as_str() {
            "require" => MySqlSslMode::Required,
            "prefer" => MySqlSslMode::Preferred,
            _ => MySqlSslMode::Disabled,
        };

        let mut options = MySqlConnectOptions::new()
            .host(config.host.as_deref().unwrap_or("localhost"))
            .port(config.effective_port())
            .username(config.user.as_deref().unwrap_or_default())
            .database(config.name.as_deref().unwrap_or_default())
            .ssl_mode(ssl_mode);

        if let Some(password) = &config.password {
            let password: &str = password.expose_secret().as_ref();
            options = options.password(password);
        }

        let timeout = Duration::from_secs(config.connect_timeout_seconds);
        let conn = tokio::time::timeout(timeout, options.connect())
            .await
            .map_err(|_| {
                VeilError::Connection(format!(
                    "Timed out connecting to {} after {}s",
                    config.display_target(),
                    config.connect_timeout_seconds
                ))
            })?
            .map_err(|e| {
                VeilError::Connection(format!(
                    "Failed to connect to {}: {}",
                    config.display_target(),
                    e
                ))
            })?;

        tracing::info!(
            target_db = %config.display_target(),
            ssl_mode = %config.ssl_mode,
            "MySQL connection established"
        );

        Ok(Self { conn })
    }

    async fn raw(&mut self, sql: &str) -> Result<()> {
        sqlx::Executor::execute(&mut self.conn, sqlx::raw_sql(sql))
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error(sql, e))
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    async fn execute_query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        let query = params.iter().fold(sqlx::query(sql), bind_value);
        let rows = query
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| map_sqlx_error("Query failed", e))?;

        rows.iter().map(from_mysql_row).collect()
    }

    async fn execute_update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let query = params.iter().fold(sqlx::query(sql), bind_value);
        let result = query
            .execute(&mut self.conn)
            .await
            .map_err(|e| map_sqlx_error("Statement execution failed", e))?;

        Ok(result.rows_affected())
    }

    async fn begin(&mut self) -> Result<()> {
        self.raw("START TRANSACTION").await
    }

    async fn commit(&mut self) -> Result<()> {
        self.raw("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.raw("ROLLBACK").await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| VeilError::Other(format!("Failed to close MySQL connection: {e}")))?;

        tracing::debug!("MySQL connection closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err = map_sqlx_error("Query failed", sqlx::Error::Io(io));
        assert!(err.is_fatal_for_run());
    }

    #[test]
    fn test_row_not_found_maps_to_database() {
        let err = map_sqlx_error("Query failed", sqlx::Error::RowNotFound);
        assert!(matches!(err, VeilError::Database(_)));
    }
}
