//! Anonymization pipeline
//!
//! For each configured table:
//!
//! 1. **Plan**: resolve the table spec against the transform registry
//! 2. **Sample consent**: preview one transformed row, ask to proceed
//! 3. **Scan**: read all rows in key order, page by page, and transform them
//! 4. **Commit consent**: preview the first transformed rows, ask to commit
//! 5. **Commit**: keyed UPDATEs inside one transaction
//!
//! # Example
//!
//! ```rust,no_run
//! use veil::adapters::database::connect;
//! use veil::anonymization::TransformRegistry;
//! use veil::config::load_config;
//! use veil::core::consent::ConsolePrompt;
//! use veil::core::pipeline::{AnonymizationPipeline, RunContext, RunSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//! let ctx = RunContext {
//!     db: connect(&config.database).await?,
//!     registry: TransformRegistry::new(&config.anonymization),
//!     consent: Box::new(ConsolePrompt::stdio()),
//!     settings: RunSettings::from_config(&config),
//! };
//!
//! let summary = AnonymizationPipeline::new(ctx).run(&config.tables).await?;
//! println!("Rows updated: {}", summary.rows_updated());
//! # Ok(())
//! # }
//! ```

pub mod committer;
pub mod orchestrator;
pub mod reader;
pub mod rows;
pub mod state;
pub mod summary;

pub use orchestrator::{AnonymizationPipeline, RunContext, RunSettings};
pub use reader::RowBatch;
pub use rows::AnonymizedRow;
pub use state::TableState;
pub use summary::{RunSummary, TableOutcome};
