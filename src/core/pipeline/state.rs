//! Per-table state machine
//!
//! ```text
//! Planned -> SampleConsentPending -> Scanning -> FinalConsentPending -> Committing -> Done
//!                    |                                  |
//!                    +------------> Aborted <-----------+
//! ```
//!
//! `Failed` is reachable from every non-terminal state.

use crate::core::pipeline::summary::TableOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Lifecycle state of one configured table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableState {
    Planned,
    SampleConsentPending,
    Scanning,
    FinalConsentPending,
    Committing,
    Done,
    Aborted,
    Failed,
}

impl TableState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: TableState) -> bool {
        use TableState::*;
        match (self, next) {
            (s, Failed) => !s.is_terminal(),
            (SampleConsentPending | FinalConsentPending, Aborted) => true,
            (Planned, SampleConsentPending)
            | (SampleConsentPending, Scanning)
            | (Scanning, FinalConsentPending)
            | (FinalConsentPending, Committing)
            | (Committing, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Planned => "planned",
            Self::SampleConsentPending => "sample_consent_pending",
            Self::Scanning => "scanning",
            Self::FinalConsentPending => "final_consent_pending",
            Self::Committing => "committing",
            Self::Done => "done",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tracks one table through the state machine and its counters
#[derive(Debug)]
pub struct TableProgress {
    table: String,
    state: TableState,
    pub rows_scanned: u64,
    pub rows_updated: u64,
    reason: Option<String>,
    started: Instant,
}

impl TableProgress {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            state: TableState::Planned,
            rows_scanned: 0,
            rows_updated: 0,
            reason: None,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Move to `next`, ignoring illegal transitions
    ///
    /// Returns `false` when the transition was refused.
    pub fn advance(&mut self, next: TableState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                table = %self.table,
                from = %self.state,
                to = %next,
                "Ignoring illegal table state transition"
            );
            return false;
        }

        tracing::debug!(table = %self.table, from = %self.state, to = %next, "Table state transition");
        self.state = next;
        true
    }

    /// Operator declined or there was nothing to do
    pub fn abort(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if self.advance(TableState::Aborted) {
            tracing::info!(table = %self.table, reason = %reason, "Table aborted");
            self.reason = Some(reason);
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        let from = self.state;
        if self.advance(TableState::Failed) {
            tracing::error!(table = %self.table, state = %from, reason = %reason, "Table failed");
            self.reason = Some(reason);
        }
    }

    /// Attach a note to a successful outcome
    pub fn note(&mut self, reason: impl Into<String>) {
        self.reason = Some(reason.into());
    }

    pub fn finish(self) -> TableOutcome {
        TableOutcome {
            table: self.table,
            state: self.state,
            rows_scanned: self.rows_scanned,
            rows_updated: self.rows_updated,
            reason: self.reason,
            duration: self.started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut progress = TableProgress::new("users");
        for next in [
            TableState::SampleConsentPending,
            TableState::Scanning,
            TableState::FinalConsentPending,
            TableState::Committing,
            TableState::Done,
        ] {
            assert!(progress.advance(next));
        }
        assert!(progress.state().is_terminal());
    }

    #[test]
    fn test_abort_only_from_consent_states() {
        assert!(TableState::SampleConsentPending.can_transition_to(TableState::Aborted));
        assert!(TableState::FinalConsentPending.can_transition_to(TableState::Aborted));
        assert!(!TableState::Scanning.can_transition_to(TableState::Aborted));
        assert!(!TableState::Committing.can_transition_to(TableState::Aborted));
    }

    #[test]
    fn test_failed_from_any_non_terminal_state() {
        assert!(TableState::Planned.can_transition_to(TableState::Failed));
        assert!(TableState::Scanning.can_transition_to(TableState::Failed));
        assert!(TableState::Committing.can_transition_to(TableState::Failed));
        assert!(!TableState::Done.can_transition_to(TableState::Failed));
        assert!(!TableState::Aborted.can_transition_to(TableState::Failed));
    }

    #[test]
    fn test_illegal_transition_is_refused() {
        let mut progress = TableProgress::new("users");
        assert!(!progress.advance(TableState::Committing));
        assert_eq!(progress.state(), TableState::Planned);
    }

    #[test]
    fn test_finish_keeps_reason() {
        let mut progress = TableProgress::new("orders");
        progress.advance(TableState::SampleConsentPending);
        progress.abort("declined at sample checkpoint");

        let outcome = progress.finish();
        assert_eq!(outcome.state, TableState::Aborted);
        assert_eq!(outcome.reason.as_deref(), Some("declined at sample checkpoint"));
    }
}
