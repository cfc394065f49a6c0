//! MySQL database integration
//!
//! Also used for MariaDB, which speaks the same protocol.

pub mod client;

pub use client::MySqlClient;
