//! Run summary and reporting
//!
//! This module defines structures for tracking and reporting per-table results.

use crate::core::pipeline::state::TableState;
use serde::Serialize;
use std::time::Duration;

/// Result of processing one table
#[derive(Debug, Clone, Serialize)]
pub struct TableOutcome {
    /// Table name
    pub table: String,

    /// Terminal state
    pub state: TableState,

    /// Rows read and transformed
    pub rows_scanned: u64,

    /// Rows reported as updated by the database
    pub rows_updated: u64,

    /// Why the table was aborted or failed
    pub reason: Option<String>,

    /// Time spent on the table
    pub duration: Duration,
}

/// Summary of a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// One entry per configured table, in processing order
    pub tables: Vec<TableOutcome>,

    /// Duration of the run
    pub duration: Duration,

    /// Whether writes were suppressed
    pub dry_run: bool,
}

impl RunSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn push(&mut self, outcome: TableOutcome) {
        self.tables.push(outcome);
    }

    fn count(&self, state: TableState) -> usize {
        self.tables.iter().filter(|t| t.state == state).count()
    }

    pub fn completed(&self) -> usize {
        self.count(TableState::Done)
    }

    pub fn aborted(&self) -> usize {
        self.count(TableState::Aborted)
    }

    pub fn failed(&self) -> usize {
        self.count(TableState::Failed)
    }

    pub fn rows_updated(&self) -> u64 {
        self.tables.iter().map(|t| t.rows_updated).sum()
    }

    /// No table failed (aborts are operator decisions, not failures)
    pub fn is_successful(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcome(&self, table: &str) -> Option<&TableOutcome> {
        self.tables.iter().find(|t| t.table == table)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            tables = self.tables.len(),
            completed = self.completed(),
            aborted = self.aborted(),
            failed = self.failed(),
            rows_updated = self.rows_updated(),
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            "Anonymization run finished"
        );

        for outcome in &self.tables {
            match outcome.state {
                TableState::Failed => tracing::warn!(
                    table = %outcome.table,
                    reason = outcome.reason.as_deref().unwrap_or("unknown"),
                    "Table failed"
                ),
                TableState::Aborted => tracing::info!(
                    table = %outcome.table,
                    reason = outcome.reason.as_deref().unwrap_or("aborted"),
                    "Table skipped"
                ),
                _ => tracing::info!(
                    table = %outcome.table,
                    rows_scanned = outcome.rows_scanned,
                    rows_updated = outcome.rows_updated,
                    "Table anonymized"
                ),
            }
        }
    }
}
