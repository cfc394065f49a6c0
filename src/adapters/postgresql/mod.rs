//! PostgreSQL database integration
//!
//! This module provides the PostgreSQL [`DatabaseClient`](crate::adapters::database::DatabaseClient)
//! and the value conversions it needs for PostgreSQL's strict parameter typing.

pub mod client;
pub mod value;

pub use client::PostgreSQLClient;
