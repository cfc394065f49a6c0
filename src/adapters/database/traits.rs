//! Database abstraction traits
//!
//! This module defines the trait that database adapters must implement
//! to be driven by the anonymization pipeline.

use crate::config::Dialect;
use crate::domain::{Result, Row, SqlValue};
use async_trait::async_trait;

/// Database client trait for in-place anonymization
///
/// One client wraps exactly one connection. Calls are issued strictly in
/// sequence; `begin`/`commit`/`rollback` bracket the writes of one table.
#[async_trait]
pub trait DatabaseClient: Send {
    /// SQL dialect spoken by this client
    fn dialect(&self) -> Dialect;

    /// Run a query and return its rows, columns in select-list order
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Database`](crate::domain::VeilError::Database) if
    /// the query fails, or
    /// [`VeilError::Connection`](crate::domain::VeilError::Connection) if the
    /// connection is gone.
    async fn execute_query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>>;

    /// Run a statement and return the number of affected rows
    ///
    /// # Errors
    ///
    /// Same as [`execute_query`](Self::execute_query).
    async fn execute_update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64>;

    /// Open a transaction
    async fn begin(&mut self) -> Result<()>;

    /// Commit the open transaction
    async fn commit(&mut self) -> Result<()>;

    /// Roll back the open transaction
    async fn rollback(&mut self) -> Result<()>;

    /// Close the connection
    async fn close(self: Box<Self>) -> Result<()>;
}
