//! Anonymization planner
//!
//! Turns a [`TableAnonymizationSpec`] into the [`AnonymizationPlan`] every
//! later stage of the pipeline works from: the primary key, the ordered
//! target columns and the operation for each of them.

use crate::anonymization::registry::TransformRegistry;
use crate::domain::{Result, TableAnonymizationSpec, VeilError};
use std::collections::HashSet;

/// Resolved column list and operation mapping for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizationPlan {
    pub table: String,
    pub primary_key: String,
    columns: Vec<String>,
    operations: Vec<String>,
}

impl AnonymizationPlan {
    /// Target columns in configured order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// `(column, operation)` pairs in configured order
    pub fn column_operations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .zip(&self.operations)
            .map(|(c, o)| (c.as_str(), o.as_str()))
    }

    pub fn operation_for(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.operations[idx].as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Structural checks shared by config validation and [`plan`]
pub fn check_spec(spec: &TableAnonymizationSpec) -> std::result::Result<(), String> {
    let table = spec.table_name.trim();
    if table.is_empty() {
        return Err("Table name cannot be empty".to_string());
    }

    if spec.primary_key.trim().is_empty() {
        return Err(format!("Table '{table}': primary_key cannot be empty"));
    }

    if spec.column_operations.is_empty() {
        return Err(format!("Table '{table}': no columns configured"));
    }

    let mut seen = HashSet::new();
    for op in &spec.column_operations {
        if op.column.trim().is_empty() {
            return Err(format!("Table '{table}': column name cannot be empty"));
        }
        if op.operation.trim().is_empty() {
            return Err(format!(
                "Table '{table}': column '{}' has no operation",
                op.column
            ));
        }
        if op.column == spec.primary_key {
            return Err(format!(
                "Table '{table}': primary key '{}' cannot be anonymized",
                op.column
            ));
        }
        if !seen.insert(op.column.as_str()) {
            return Err(format!(
                "Table '{table}': column '{}' is configured more than once",
                op.column
            ));
        }
    }

    Ok(())
}

/// Build the plan for one table
///
/// Operations the registry does not know are logged once here; the row-level
/// passthrough in [`TransformRegistry::apply`] still applies to them.
///
/// # Errors
///
/// Returns [`VeilError::Configuration`] if the spec fails [`check_spec`].
pub fn plan(spec: &TableAnonymizationSpec, registry: &TransformRegistry) -> Result<AnonymizationPlan> {
    check_spec(spec).map_err(VeilError::Configuration)?;

    for op in &spec.column_operations {
        if !registry.contains(&op.operation) {
            tracing::error!(
                table = %spec.table_name,
                column = %op.column,
                operation = %op.operation,
                "Unknown mask type, column will be left unchanged"
            );
        }
    }

    Ok(AnonymizationPlan {
        table: spec.table_name.clone(),
        primary_key: spec.primary_key.clone(),
        columns: spec.columns().map(str::to_string).collect(),
        operations: spec
            .column_operations
            .iter()
            .map(|op| op.operation.clone())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::AnonymizationConfig;

    fn registry() -> TransformRegistry {
        TransformRegistry::new(&AnonymizationConfig::default())
    }

    fn users_spec() -> TableAnonymizationSpec {
        TableAnonymizationSpec::new("users")
            .with_column("email", "email")
            .with_column("phone", "phone")
            .with_column("password", "password")
    }

    #[test]
    fn test_plan_keeps_configured_order() {
        let plan = plan(&users_spec(), &registry()).unwrap();

        assert_eq!(plan.table, "users");
        assert_eq!(plan.primary_key, "id");
        assert_eq!(plan.columns(), ["email", "phone", "password"]);
        assert_eq!(plan.operation_for("phone"), Some("phone"));
        assert_eq!(plan.operation_for("address"), None);
    }

    #[test]
    fn test_plan_rejects_empty_columns() {
        let err = plan(&TableAnonymizationSpec::new("users"), &registry()).unwrap_err();
        assert!(matches!(err, VeilError::Configuration(_)));
    }

    #[test]
    fn test_plan_rejects_duplicate_column() {
        let spec = users_spec().with_column("email", "email:shuffle");
        let err = plan(&spec, &registry()).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_plan_rejects_primary_key_target() {
        let spec = users_spec().with_column("id", "password");
        assert!(check_spec(&spec).unwrap_err().contains("primary key"));
    }

    #[test]
    fn test_plan_rejects_empty_primary_key() {
        let spec = users_spec().with_primary_key("");
        assert!(check_spec(&spec).is_err());
    }

    #[test]
    fn test_unknown_operation_is_not_a_planning_error() {
        let spec = users_spec().with_column("ssn", "ssn:mask");
        let plan = plan(&spec, &registry()).unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.operation_for("ssn"), Some("ssn:mask"));
    }
}
