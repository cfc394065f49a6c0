//! Database abstraction layer
//!
//! This module provides a trait-based abstraction for database operations,
//! allowing Veil to work with different SQL dialects (PostgreSQL, MySQL).

pub mod factory;
pub mod sql;
pub mod traits;

pub use factory::connect;
pub use traits::DatabaseClient;
