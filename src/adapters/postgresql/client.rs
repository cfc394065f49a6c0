//! PostgreSQL client implementation
//!
//! This module provides the [`DatabaseClient`] for PostgreSQL over a single
//! `tokio-postgres` connection.

use crate::adapters::database::DatabaseClient;
use crate::adapters::postgresql::value::{from_pg_row, to_param, PgParam};
use crate::config::{DatabaseConfig, Dialect};
use crate::domain::{Result, Row, SqlValue, VeilError};
use async_trait::async_trait;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Statement};

/// PostgreSQL client for Veil
///
/// Owns one connection; the driver's connection future runs on a spawned
/// tokio task until the client is closed. Prepared statements are cached by
/// SQL text for the lifetime of the connection.
pub struct PostgreSQLClient {
    client: tokio_postgres::Client,
    connection_task: JoinHandle<()>,
    statements: HashMap<String, Statement>,
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| VeilError::Configuration(format!("{field} cannot be empty")))
}

fn spawn_connection<F>(connection: F) -> JoinHandle<()>
where
    F: Future<Output = std::result::Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(error = %e, "PostgreSQL connection error");
        }
    })
}

/// Map a driver error, treating a closed connection as fatal for the run
fn map_pg_error(context: &str, err: tokio_postgres::Error) -> VeilError {
    let detail = err
        .as_db_error()
        .map(|db| db.message().to_string())
        .unwrap_or_else(|| err.to_string());

    if err.is_closed() {
        VeilError::Connection(format!("{context}: connection closed: {detail}"))
    } else {
        VeilError::Database(format!("{context}: {detail}"))
    }
}

impl PostgreSQLClient {
    /// Connect to the configured server
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Connection`] if the connection or TLS handshake
    /// fails, or [`VeilError::Configuration`] if required fields are missing.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut pg = tokio_postgres::Config::new();
        pg.host(required("database.host", &config.host)?)
            .port(config.effective_port())
            .user(required("database.user", &config.user)?)
            .dbname(required("database.name", &config.name)?)
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds));

        if let Some(password) = &config.password {
            let password: &str = password.expose_secret().as_ref();
            pg.password(password);
        }

        let connect_err = |e: tokio_postgres::Error| {
            VeilError::Connection(format!(
                "Failed to connect to {}: {}",
                config.display_target(),
                e
            ))
        };

        let (client, connection_task) = match config.ssl_mode.as_str() {
            "disable" => {
                pg.ssl_mode(SslMode::Disable);
                let (client, connection) = pg.connect(NoTls).await.map_err(connect_err)?;
                (client, spawn_connection(connection))
            }
            mode => {
                pg.ssl_mode(if mode == "require" {
                    SslMode::Require
                } else {
                    SslMode::Prefer
                });
                let connector = native_tls::TlsConnector::builder()
                    .build()
                    .map_err(|e| VeilError::Connection(format!("TLS setup failed: {e}")))?;
                let (client, connection) = pg
                    .connect(MakeTlsConnector::new(connector))
                    .await
                    .map_err(connect_err)?;
                (client, spawn_connection(connection))
            }
        };

        tracing::info!(
            target_db = %config.display_target(),
            ssl_mode = %config.ssl_mode,
            "PostgreSQL connection established"
        );

        Ok(Self {
            client,
            connection_task,
            statements: HashMap::new(),
        })
    }

    async fn statement(&mut self, sql: &str) -> Result<Statement> {
        if let Some(statement) = self.statements.get(sql) {
            return Ok(statement.clone());
        }

        let statement = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| map_pg_error("Prepare failed", e))?;
        self.statements.insert(sql.to_string(), statement.clone());
        Ok(statement)
    }

    fn bind(statement: &Statement, params: &[SqlValue]) -> Result<Vec<PgParam>> {
        if statement.params().len() != params.len() {
            return Err(VeilError::Database(format!(
                "Statement expects {} parameters, got {}",
                statement.params().len(),
                params.len()
            )));
        }

        statement
            .params()
            .iter()
            .zip(params)
            .map(|(ty, value)| to_param(value, ty))
            .collect()
    }

    async fn simple(&self, sql: &str) -> Result<()> {
        self.client
            .batch_execute(sql)
            .await
            .map_err(|e| map_pg_error(sql, e))
    }
}

#[async_trait]
impl DatabaseClient for PostgreSQLClient {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn execute_query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        let statement = self.statement(sql).await?;
        let bound = Self::bind(&statement, params)?;
        let refs: Vec<&(dyn ToSql + Sync)> = bound
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let rows = self
            .client
            .query(&statement, &refs)
            .await
            .map_err(|e| map_pg_error("Query failed", e))?;

        rows.iter().map(from_pg_row).collect()
    }

    async fn execute_update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let statement = self.statement(sql).await?;
        let bound = Self::bind(&statement, params)?;
        let refs: Vec<&(dyn ToSql + Sync)> = bound
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        self.client
            .execute(&statement, &refs)
            .await
            .map_err(|e| map_pg_error("Statement execution failed", e))
    }

    async fn begin(&mut self) -> Result<()> {
        self.simple("BEGIN").await
    }

    async fn commit(&mut self) -> Result<()> {
        self.simple("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.simple("ROLLBACK").await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let Self {
            client,
            connection_task,
            ..
        } = *self;

        // dropping the client ends the connection future
        drop(client);
        connection_task
            .await
            .map_err(|e| VeilError::Other(format!("PostgreSQL connection task failed: {e}")))?;

        tracing::debug!("PostgreSQL connection closed");
        Ok(())
    }
}
