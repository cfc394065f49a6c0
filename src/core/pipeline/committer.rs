//! Batch committer
//!
//! Writes all anonymized rows of one table inside a single transaction. Rows
//! are walked in chunks of the batch size purely for progress reporting; the
//! transaction is committed once, at the end.

use crate::adapters::database::sql;
use crate::adapters::database::DatabaseClient;
use crate::anonymization::AnonymizationPlan;
use crate::core::pipeline::rows::AnonymizedRow;
use crate::domain::{Result, VeilError};

async fn rollback(db: &mut dyn DatabaseClient, table: &str) {
    match db.rollback().await {
        Ok(()) => tracing::warn!(table = %table, "Transaction rolled back"),
        Err(e) => tracing::error!(table = %table, error = %e, "Rollback failed"),
    }
}

fn commit_error(table: &str, row: usize, err: VeilError) -> VeilError {
    if err.is_fatal_for_run() {
        return err;
    }
    VeilError::Commit {
        table: table.to_string(),
        row,
        message: err.to_string(),
    }
}

/// Update every row, keyed by primary key, and commit
///
/// Returns the number of rows the database reported as updated. With
/// `dry_run` set nothing is executed and `0` is returned.
///
/// # Errors
///
/// Returns [`VeilError::Commit`] naming the 1-based row that failed after
/// rolling the transaction back. A lost connection is returned as
/// [`VeilError::Connection`].
pub async fn commit_rows(
    db: &mut dyn DatabaseClient,
    plan: &AnonymizationPlan,
    rows: &[AnonymizedRow],
    batch_size: usize,
    dry_run: bool,
) -> Result<u64> {
    let table = plan.table.as_str();
    let total = rows.len();
    let statement = sql::update_sql(db.dialect(), table, &plan.primary_key, plan.columns());

    if dry_run {
        tracing::info!(
            table = %table,
            rows = total,
            statement = %statement,
            "Dry run: skipping updates"
        );
        return Ok(0);
    }

    db.begin().await?;
    tracing::debug!(table = %table, rows = total, "Transaction started");

    let mut updated = 0u64;
    let mut written = 0usize;

    for chunk in rows.chunks(batch_size.max(1)) {
        for row in chunk {
            written += 1;
            match db.execute_update(&statement, &row.update_params()).await {
                Ok(0) => tracing::warn!(
                    table = %table,
                    primary_key = %row.primary_key_value,
                    "Update matched no rows, row may have been deleted"
                ),
                Ok(1) => updated += 1,
                Ok(n) => {
                    tracing::error!(
                        table = %table,
                        row = written,
                        primary_key = %row.primary_key_value,
                        matched = n,
                        "Primary key is not unique"
                    );
                    rollback(db, table).await;
                    return Err(VeilError::Commit {
                        table: table.to_string(),
                        row: written,
                        message: format!("primary key '{}' matched {n} rows", plan.primary_key),
                    });
                }
                Err(e) => {
                    tracing::error!(
                        table = %table,
                        row = written,
                        total,
                        error = %e,
                        "Update failed"
                    );
                    rollback(db, table).await;
                    return Err(commit_error(table, written, e));
                }
            }
        }

        crate::log_write_progress!(table, written, total);
    }

    if let Err(e) = db.commit().await {
        tracing::error!(table = %table, error = %e, "Commit failed");
        rollback(db, table).await;
        return Err(commit_error(table, total, e));
    }

    tracing::info!(table = %table, rows_updated = updated, "Transaction committed");
    Ok(updated)
}
