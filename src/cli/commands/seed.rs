//! Seed command implementation
//!
//! Wipes and refills the demo `users` and `orders` tables without running
//! the pipeline.

use super::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::adapters::database::connect;
use crate::config::load_config;
use crate::core::seed::TestSeeder;
use clap::Args;

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {}

impl SeedArgs {
    /// Execute the seed command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let mut db = match connect(&config.database).await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("Failed to connect to database: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let result = TestSeeder::new(db.as_mut()).run().await;
        if let Err(e) = db.close().await {
            tracing::warn!(error = %e, "Failed to close database connection");
        }

        match result {
            Ok(report) => {
                println!(
                    "🌱 Seeded {} users and {} orders into {}",
                    report.users,
                    report.orders,
                    config.database.display_target()
                );
                Ok(EXIT_OK)
            }
            Err(e) => {
                eprintln!("Seeding failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
