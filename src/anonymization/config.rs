//! Anonymization configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Variant used by the bare `email`, `phone` and `address` operation names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnonymizationStrategy {
    /// Pattern-based redaction with `*`
    #[default]
    Mask,
    /// Deterministic permutation seeded from the original value
    Shuffle,
}

impl fmt::Display for AnonymizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnonymizationStrategy::Mask => f.write_str("mask"),
            AnonymizationStrategy::Shuffle => f.write_str("shuffle"),
        }
    }
}

/// Variant used by the bare `date` operation name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
    /// Add a fixed number of days
    #[default]
    Shift,
    /// Keep only the year
    Mask,
}

impl fmt::Display for DateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateMode::Shift => f.write_str("shift"),
            DateMode::Mask => f.write_str("mask"),
        }
    }
}

/// Pipeline and transform settings from the `[anonymization]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Rows per page when scanning and per progress step when committing
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum rows shown at the commit checkpoint
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Offset applied by `date:shift`
    #[serde(default = "default_date_shift_days")]
    pub date_shift_days: i64,

    /// Variant for bare email/phone/address operations
    #[serde(default)]
    pub strategy: AnonymizationStrategy,

    /// Variant for the bare date operation
    #[serde(default)]
    pub date_mode: DateMode,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            preview_rows: default_preview_rows(),
            date_shift_days: default_date_shift_days(),
            strategy: AnonymizationStrategy::default(),
            date_mode: DateMode::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 || self.batch_size > 10_000 {
            return Err(format!(
                "anonymization.batch_size must be between 1 and 10000, got {}",
                self.batch_size
            ));
        }

        if self.preview_rows == 0 {
            return Err("anonymization.preview_rows must be > 0".to_string());
        }

        if self.date_shift_days.abs() > 36_500 {
            return Err(format!(
                "anonymization.date_shift_days must be within +/-36500, got {}",
                self.date_shift_days
            ));
        }

        Ok(())
    }
}

fn default_batch_size() -> usize {
    100
}

fn default_preview_rows() -> usize {
    15
}

fn default_date_shift_days() -> i64 {
    10
}
