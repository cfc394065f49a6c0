//! Table anonymization specifications
//!
//! A [`TableAnonymizationSpec`] is built once per configured table from the
//! `[[tables]]` section of the configuration file and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// One target column and the operation applied to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOperation {
    /// Column to rewrite
    pub column: String,

    /// Operation name as registered in the transform registry
    pub operation: String,
}

impl ColumnOperation {
    pub fn new(column: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operation: operation.into(),
        }
    }
}

/// Anonymization settings for a single table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAnonymizationSpec {
    /// Table to anonymize
    #[serde(rename = "name")]
    pub table_name: String,

    /// Single-column primary key used to address rows
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Target columns in preview and UPDATE order
    #[serde(rename = "columns", default)]
    pub column_operations: Vec<ColumnOperation>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl TableAnonymizationSpec {
    /// Create a spec with the default `id` primary key
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            primary_key: default_primary_key(),
            column_operations: Vec::new(),
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn with_column(mut self, column: impl Into<String>, operation: impl Into<String>) -> Self {
        self.column_operations
            .push(ColumnOperation::new(column, operation));
        self
    }

    /// Target column names in configured order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.column_operations.iter().map(|c| c.column.as_str())
    }
}
