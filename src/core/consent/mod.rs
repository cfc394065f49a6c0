//! Preview and consent gate
//!
//! Every table passes two checkpoints before anything is written:
//!
//! 1. **Sample**: one row is transformed and shown next to its original,
//!    together with the row count and batch size.
//! 2. **Commit**: after the full scan, the first rows of the result are shown
//!    and the operator confirms the write.
//!
//! Anything but an affirmative answer aborts the table.

pub mod prompt;
pub mod render;

pub use prompt::{is_affirmative, AutoApprove, ConsentPrompt, ConsolePrompt};

use crate::adapters::database::DatabaseClient;
use crate::anonymization::{AnonymizationPlan, TransformRegistry};
use crate::core::pipeline::reader;
use crate::core::pipeline::rows::{anonymize_row, AnonymizedRow};
use crate::domain::Result;

/// Outcome of a checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Abort(String),
}

/// Sample checkpoint
///
/// An empty table aborts with a warning without asking.
pub async fn sample_checkpoint(
    db: &mut dyn DatabaseClient,
    registry: &TransformRegistry,
    prompt: &mut dyn ConsentPrompt,
    plan: &AnonymizationPlan,
    batch_size: usize,
) -> Result<Decision> {
    let table = plan.table.as_str();
    let total = reader::count_rows(db, table).await?;
    let sample = reader::sample_row(db, table, &plan.primary_key, plan.columns()).await?;

    let Some((key, row)) = sample else {
        tracing::warn!(table = %table, "Table has no rows, skipping");
        return Ok(Decision::Abort("table has no rows".to_string()));
    };

    let anonymized = anonymize_row(plan, registry, &key, &row)?;

    tracing::info!(table = %table, "Sample row before and after anonymization");
    prompt.show(&render::sample_table(&plan.primary_key, &anonymized))?;

    let question = format!(
        "The table '{table}' has {total} rows. The anonymization will be performed in batches of {batch_size} rows. Do you want to proceed with the update? (yes/no)"
    );
    if prompt.confirm(&question)? {
        Ok(Decision::Proceed)
    } else {
        tracing::info!(table = %table, "Update aborted by operator at sample checkpoint");
        Ok(Decision::Abort("declined at sample checkpoint".to_string()))
    }
}

/// Commit checkpoint
pub fn commit_checkpoint(
    prompt: &mut dyn ConsentPrompt,
    plan: &AnonymizationPlan,
    rows: &[AnonymizedRow],
    preview_rows: usize,
) -> Result<Decision> {
    let mut preview = String::from("Preview:\n");
    preview.push_str(&render::preview_table(
        &plan.primary_key,
        plan.columns(),
        rows,
        preview_rows,
    ));
    if rows.len() > preview_rows {
        preview.push_str(&format!(
            "\n({} of {} rows shown)",
            preview_rows,
            rows.len()
        ));
    }
    prompt.show(&preview)?;

    if prompt.confirm("Are you sure you want to commit these changes? (yes/no)")? {
        Ok(Decision::Proceed)
    } else {
        tracing::info!(table = %plan.table, "Update aborted by operator at commit checkpoint");
        Ok(Decision::Abort("declined at commit checkpoint".to_string()))
    }
}
