//! Run command implementation
//!
//! This module implements the `run` command, which anonymizes every
//! configured table in place.

use super::{exit_code_for, EXIT_CONFIG, EXIT_OK, EXIT_TABLE_FAILED};
use crate::adapters::database::connect;
use crate::anonymization::TransformRegistry;
use crate::config::{load_config, Dialect};
use crate::core::consent::{AutoApprove, ConsentPrompt, ConsolePrompt};
use crate::core::pipeline::{AnonymizationPipeline, RunContext, RunSettings, RunSummary, TableState};
use crate::core::seed::TestSeeder;
use clap::{Args, ValueEnum};

/// Which data the run operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunMode {
    /// Anonymize the configured database as it is
    #[default]
    Live,
    /// Seed the demo tables first, then anonymize
    Test,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Live data or freshly seeded demo data
    #[arg(long, value_enum, default_value_t = RunMode::Live)]
    pub mode: RunMode,

    /// Override the database dialect (postgres or mysql)
    #[arg(long)]
    pub dialect: Option<Dialect>,

    /// Approve every checkpoint without prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Render previews but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(mode = ?self.mode, "Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Some(dialect) = self.dialect {
            tracing::info!(dialect = %dialect, "Overriding database dialect from CLI");
            config.database.dialect = dialect;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No changes will be written to the database");
            println!();
        }

        tracing::info!(database = %config.database.display_target(), "Connecting to database");
        let mut db = match connect(&config.database).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database");
                eprintln!("Failed to connect to database: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if self.mode == RunMode::Test {
            match TestSeeder::new(db.as_mut()).run().await {
                Ok(report) => {
                    println!(
                        "🌱 Seeded demo data: {} users, {} orders",
                        report.users, report.orders
                    );
                    println!();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Seeding failed");
                    eprintln!("Failed to seed demo data: {e}");
                    if let Err(close_err) = db.close().await {
                        tracing::warn!(error = %close_err, "Failed to close database connection");
                    }
                    return Ok(exit_code_for(&e));
                }
            }
        }

        let consent: Box<dyn ConsentPrompt> = if self.yes {
            tracing::info!("Checkpoints will be approved automatically");
            Box::new(AutoApprove)
        } else {
            Box::new(ConsolePrompt::stdio())
        };

        let ctx = RunContext {
            db,
            registry: TransformRegistry::new(&config.anonymization),
            consent,
            settings: RunSettings::from_config(&config),
        };

        let summary = match AnonymizationPipeline::new(ctx).run(&config.tables).await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Run terminated: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&summary);

        let exit_code = if summary.is_successful() {
            println!("✅ Run completed");
            EXIT_OK
        } else {
            println!("⚠️  Run completed with failures");
            EXIT_TABLE_FAILED
        };

        Ok(exit_code)
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Run Summary:");
    for outcome in &summary.tables {
        let marker = match outcome.state {
            TableState::Done => "✅",
            TableState::Aborted => "⏹️ ",
            _ => "❌",
        };
        print!(
            "  {marker} {}: {} ({} scanned, {} updated)",
            outcome.table, outcome.state, outcome.rows_scanned, outcome.rows_updated
        );
        match &outcome.reason {
            Some(reason) => println!(" - {reason}"),
            None => println!(),
        }
    }
    println!(
        "  Completed: {}, Aborted: {}, Failed: {}",
        summary.completed(),
        summary.aborted(),
        summary.failed()
    );
    println!("  Rows updated: {}", summary.rows_updated());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();
}
