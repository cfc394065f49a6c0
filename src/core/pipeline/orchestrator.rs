//! Pipeline orchestrator - drives every configured table through the pipeline
//!
//! Tables are processed strictly one after another, in configuration order.
//! An abort or failure only ends the table it happened on; a lost connection
//! ends the run.

use crate::adapters::database::DatabaseClient;
use crate::anonymization::{planner, AnonymizationPlan, TransformRegistry};
use crate::config::VeilConfig;
use crate::core::consent::{self, ConsentPrompt, Decision};
use crate::core::pipeline::committer;
use crate::core::pipeline::reader;
use crate::core::pipeline::rows::{anonymize_batch, AnonymizedRow};
use crate::core::pipeline::state::{TableProgress, TableState};
use crate::core::pipeline::summary::{RunSummary, TableOutcome};
use crate::domain::{Result, TableAnonymizationSpec, VeilError};
use std::time::Instant;

/// Settings that stay fixed for a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub batch_size: usize,
    pub preview_rows: usize,
    pub dry_run: bool,
}

impl RunSettings {
    pub fn from_config(config: &VeilConfig) -> Self {
        Self {
            batch_size: config.anonymization.batch_size,
            preview_rows: config.anonymization.preview_rows,
            dry_run: config.application.dry_run,
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            batch_size: 100,
            preview_rows: 15,
            dry_run: false,
        }
    }
}

/// Everything a run needs, passed explicitly to each stage
pub struct RunContext {
    pub db: Box<dyn DatabaseClient>,
    pub registry: TransformRegistry,
    pub consent: Box<dyn ConsentPrompt>,
    pub settings: RunSettings,
}

/// Anonymization pipeline
pub struct AnonymizationPipeline {
    ctx: RunContext,
}

impl AnonymizationPipeline {
    pub fn new(ctx: RunContext) -> Self {
        Self { ctx }
    }

    /// Process every table in order, then close the connection
    ///
    /// # Errors
    ///
    /// Only errors that end the whole run are returned (a lost connection).
    /// Per-table failures are recorded in the [`RunSummary`].
    pub async fn run(mut self, tables: &[TableAnonymizationSpec]) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new(self.ctx.settings.dry_run);

        tracing::info!(
            tables = tables.len(),
            batch_size = self.ctx.settings.batch_size,
            dry_run = self.ctx.settings.dry_run,
            "Starting anonymization run"
        );

        let mut fatal = None;
        for spec in tables {
            match self.process_table(spec).await {
                Ok(outcome) => summary.push(outcome),
                Err((outcome, e)) => {
                    summary.push(outcome);
                    fatal = Some(e);
                    break;
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        if let Err(e) = self.ctx.db.close().await {
            tracing::warn!(error = %e, "Failed to close database connection");
        }

        match fatal {
            Some(e) => {
                tracing::error!(error = %e, "Run terminated");
                Err(e)
            }
            None => Ok(summary),
        }
    }

    /// Run one table to a terminal state
    ///
    /// Errors that end the run are returned alongside the table's outcome.
    async fn process_table(
        &mut self,
        spec: &TableAnonymizationSpec,
    ) -> std::result::Result<TableOutcome, (TableOutcome, VeilError)> {
        let mut progress = TableProgress::new(&spec.table_name);
        tracing::info!(table = %spec.table_name, "Anonymizing table");

        match self.drive_table(spec, &mut progress).await {
            Ok(()) => Ok(progress.finish()),
            Err(e) if e.is_fatal_for_run() => {
                progress.fail(e.to_string());
                Err((progress.finish(), e))
            }
            Err(e) => {
                progress.fail(e.to_string());
                Ok(progress.finish())
            }
        }
    }

    async fn drive_table(
        &mut self,
        spec: &TableAnonymizationSpec,
        progress: &mut TableProgress,
    ) -> Result<()> {
        let ctx = &mut self.ctx;
        let plan = planner::plan(spec, &ctx.registry)?;

        progress.advance(TableState::SampleConsentPending);
        let decision = consent::sample_checkpoint(
            ctx.db.as_mut(),
            &ctx.registry,
            ctx.consent.as_mut(),
            &plan,
            ctx.settings.batch_size,
        )
        .await?;
        if let Decision::Abort(reason) = decision {
            progress.abort(reason);
            return Ok(());
        }

        progress.advance(TableState::Scanning);
        let rows = scan(ctx, &plan).await?;
        progress.rows_scanned = rows.len() as u64;

        progress.advance(TableState::FinalConsentPending);
        let decision = consent::commit_checkpoint(
            ctx.consent.as_mut(),
            &plan,
            &rows,
            ctx.settings.preview_rows,
        )?;
        if let Decision::Abort(reason) = decision {
            // rows are dropped here, nothing was written
            progress.abort(reason);
            return Ok(());
        }

        progress.advance(TableState::Committing);
        progress.rows_updated = committer::commit_rows(
            ctx.db.as_mut(),
            &plan,
            &rows,
            ctx.settings.batch_size,
            ctx.settings.dry_run,
        )
        .await?;

        if ctx.settings.dry_run {
            progress.note("dry run, no changes written");
        }
        progress.advance(TableState::Done);
        Ok(())
    }
}

/// Read and transform every row of the table, page by page
async fn scan(ctx: &mut RunContext, plan: &AnonymizationPlan) -> Result<Vec<AnonymizedRow>> {
    let batch_size = ctx.settings.batch_size;
    let mut offset = 0u64;
    let mut anonymized = Vec::new();

    loop {
        let batch = reader::read_batch(
            ctx.db.as_mut(),
            &plan.table,
            &plan.primary_key,
            plan.columns(),
            batch_size,
            offset,
        )
        .await?;

        if batch.is_empty() {
            break;
        }

        anonymized.extend(anonymize_batch(plan, &ctx.registry, &batch)?);
        offset += batch.len() as u64;

        tracing::debug!(table = %plan.table, rows = anonymized.len(), "Scanned batch");
    }

    tracing::info!(table = %plan.table, rows = anonymized.len(), "Scan complete");
    Ok(anonymized)
}
