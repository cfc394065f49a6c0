//! Converting fetched rows into before/after pairs

use crate::anonymization::{AnonymizationPlan, TransformRegistry};
use crate::core::pipeline::reader::RowBatch;
use crate::domain::{Result, Row, SqlValue, VeilError};

/// A row's key with its target column values before and after transformation
///
/// Both rows hold exactly the plan's columns, in plan order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymizedRow {
    pub primary_key_value: SqlValue,
    pub original_values: Row,
    pub new_values: Row,
}

impl AnonymizedRow {
    /// UPDATE parameters: new values in column order, then the key
    pub fn update_params(&self) -> Vec<SqlValue> {
        self.new_values
            .iter()
            .map(|(_, value)| value.clone())
            .chain(std::iter::once(self.primary_key_value.clone()))
            .collect()
    }
}

/// Apply the plan's operations to one row
///
/// # Errors
///
/// Returns [`VeilError::Transform`] if a value cannot be transformed, or
/// [`VeilError::Database`] if a planned column is missing from the row.
pub fn anonymize_row(
    plan: &AnonymizationPlan,
    registry: &TransformRegistry,
    key: &SqlValue,
    row: &Row,
) -> Result<AnonymizedRow> {
    let mut original_values = Row::new();
    let mut new_values = Row::new();

    for (column, operation) in plan.column_operations() {
        let original = row.get(column).ok_or_else(|| {
            VeilError::Database(format!(
                "Column '{column}' missing from '{}' row {key}",
                plan.table
            ))
        })?;
        let anonymized = registry.apply(operation, original)?;

        original_values.push(column, original.clone());
        new_values.push(column, anonymized);
    }

    Ok(AnonymizedRow {
        primary_key_value: key.clone(),
        original_values,
        new_values,
    })
}

/// Apply the plan to every row of a batch, in key order
pub fn anonymize_batch(
    plan: &AnonymizationPlan,
    registry: &TransformRegistry,
    batch: &RowBatch,
) -> Result<Vec<AnonymizedRow>> {
    batch
        .iter()
        .map(|(key, row)| anonymize_row(plan, registry, key, row))
        .collect()
}
