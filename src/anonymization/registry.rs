//! Transform registry
//!
//! Maps operation names to value transforms. Qualified names
//! (`email:mask`, `date:shift`, ...) always exist; the bare names used in
//! table configurations (`email`, `phone`, `password`, `address`, `date`)
//! are aliases chosen from the [`AnonymizationConfig`].
//!
//! # Examples
//!
//! ```
//! use veil::anonymization::config::AnonymizationConfig;
//! use veil::anonymization::registry::TransformRegistry;
//! use veil::domain::SqlValue;
//!
//! let registry = TransformRegistry::new(&AnonymizationConfig::default());
//! let masked = registry.apply("phone", &SqlValue::from("1234567890")).unwrap();
//! assert_eq!(masked, SqlValue::from("******7890"));
//! ```

use crate::anonymization::config::{AnonymizationConfig, AnonymizationStrategy, DateMode};
use crate::anonymization::transforms::{date, hash, mask, shuffle};
use crate::domain::{SqlValue, TransformError};
use std::collections::HashMap;
use std::sync::Arc;

/// A registered value transform
pub type TransformFn = Arc<dyn Fn(&SqlValue) -> Result<SqlValue, TransformError> + Send + Sync>;

/// Lookup table from operation name to transform
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, TransformFn>,
}

impl TransformRegistry {
    /// Registry with no operations
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in operation and the bare-name aliases
    /// selected by `config`
    pub fn new(config: &AnonymizationConfig) -> Self {
        let mut registry = Self::empty();

        registry.register_text("email:mask", mask::mask_email);
        registry.register_text("email:shuffle", shuffle::shuffle_email);
        registry.register_text("phone:mask", mask::mask_phone);
        registry.register_text("phone:shuffle", shuffle::shuffle_phone);
        registry.register_text("address:mask", mask::mask_address);
        registry.register_text("address:shuffle", shuffle::shuffle_address);
        registry.register_text("password:hash", hash::hash_value);
        registry.register("date:shift", date_shift(config.date_shift_days));
        registry.register("date:mask", date_mask);

        let variant = match config.strategy {
            AnonymizationStrategy::Mask => "mask",
            AnonymizationStrategy::Shuffle => "shuffle",
        };
        for kind in ["email", "phone", "address"] {
            registry.alias(kind, &format!("{kind}:{variant}"));
        }
        registry.alias("password", "password:hash");
        registry.alias(
            "date",
            match config.date_mode {
                DateMode::Shift => "date:shift",
                DateMode::Mask => "date:mask",
            },
        );

        registry
    }

    /// Register (or replace) a transform under `name`
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&SqlValue) -> Result<SqlValue, TransformError> + Send + Sync + 'static,
    {
        self.transforms.insert(name.into(), Arc::new(transform));
    }

    /// Register a string-to-string function as a text transform
    ///
    /// `Null` passes through; any other non-text value is rejected.
    pub fn register_text(&mut self, name: &str, f: fn(&str) -> String) {
        let operation = name.to_string();
        self.register(name, move |value: &SqlValue| match value {
            SqlValue::Null => Ok(SqlValue::Null),
            SqlValue::Text(s) => Ok(SqlValue::Text(f(s))),
            other => Err(TransformError::UnsupportedValue {
                operation: operation.clone(),
                kind: other.kind().to_string(),
            }),
        });
    }

    /// Make `alias` resolve to the transform registered as `target`
    ///
    /// Returns `false` if `target` is not registered.
    pub fn alias(&mut self, alias: &str, target: &str) -> bool {
        match self.transforms.get(target).cloned() {
            Some(transform) => {
                self.transforms.insert(alias.to_string(), transform);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.transforms.contains_key(operation)
    }

    /// Registered operation names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the transform registered as `operation`
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnknownOperation`] if nothing is registered
    /// under that name, or the transform's own error.
    pub fn transform(&self, operation: &str, value: &SqlValue) -> Result<SqlValue, TransformError> {
        let transform = self
            .transforms
            .get(operation)
            .ok_or_else(|| TransformError::UnknownOperation(operation.to_string()))?;
        transform(value)
    }

    /// Like [`transform`](Self::transform), but an unknown operation is
    /// logged and the value passed through unchanged
    pub fn apply(&self, operation: &str, value: &SqlValue) -> Result<SqlValue, TransformError> {
        match self.transform(operation, value) {
            Err(TransformError::UnknownOperation(name)) => {
                tracing::error!(operation = %name, "Unknown mask type, value left unchanged");
                Ok(value.clone())
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("operations", &self.names())
            .finish()
    }
}

fn date_shift(days: i64) -> impl Fn(&SqlValue) -> Result<SqlValue, TransformError> {
    move |value: &SqlValue| {
        let overflow = || TransformError::InvalidDate {
            operation: "date:shift".to_string(),
            value: value.to_string(),
        };

        match value {
            SqlValue::Null => Ok(SqlValue::Null),
            SqlValue::Date(d) => date::shift_date(*d, days)
                .map(SqlValue::Date)
                .ok_or_else(overflow),
            SqlValue::Timestamp(ts) => date::shift_timestamp(*ts, days)
                .map(SqlValue::Timestamp)
                .ok_or_else(overflow),
            SqlValue::Text(s) => date::parse_date_text(s)
                .and_then(|d| date::shift_date(d, days))
                .map(|d| SqlValue::Text(date::format_date(d)))
                .ok_or_else(overflow),
            other => Err(TransformError::UnsupportedValue {
                operation: "date:shift".to_string(),
                kind: other.kind().to_string(),
            }),
        }
    }
}

// A masked date is no longer a date, so only text columns can hold it.
fn date_mask(value: &SqlValue) -> Result<SqlValue, TransformError> {
    match value {
        SqlValue::Null => Ok(SqlValue::Null),
        SqlValue::Text(s) => Ok(SqlValue::Text(date::mask_date_text(s))),
        other => Err(TransformError::UnsupportedValue {
            operation: "date:mask".to_string(),
            kind: other.kind().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn default_registry() -> TransformRegistry {
        TransformRegistry::new(&AnonymizationConfig::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bare_names_use_mask_by_default() {
        let registry = default_registry();
        assert_eq!(
            registry.apply("email", &"john@example.com".into()).unwrap(),
            SqlValue::from("j**n@example.com")
        );
        assert_eq!(
            registry.apply("address", &"456 Elm St".into()).unwrap(),
            SqlValue::from("456 *** **")
        );
    }

    #[test]
    fn test_shuffle_strategy_switches_aliases() {
        let config = AnonymizationConfig {
            strategy: AnonymizationStrategy::Shuffle,
            ..AnonymizationConfig::default()
        };
        let registry = TransformRegistry::new(&config);
        let value = SqlValue::from("1234567890");

        assert_eq!(
            registry.apply("phone", &value).unwrap(),
            registry.apply("phone:shuffle", &value).unwrap()
        );
    }

    #[test]
    fn test_password_always_hashes() {
        let config = AnonymizationConfig {
            strategy: AnonymizationStrategy::Shuffle,
            ..AnonymizationConfig::default()
        };
        let registry = TransformRegistry::new(&config);
        assert_eq!(
            registry.apply("password", &"password123".into()).unwrap(),
            SqlValue::from("ef92b778ba")
        );
    }

    #[test]
    fn test_date_shift_keeps_value_type() {
        let registry = default_registry();
        assert_eq!(
            registry.apply("date", &SqlValue::Date(date(2023, 1, 1))).unwrap(),
            SqlValue::Date(date(2023, 1, 11))
        );
        assert_eq!(
            registry.apply("date", &"2023-01-01".into()).unwrap(),
            SqlValue::from("2023-01-11")
        );
    }

    #[test]
    fn test_date_mask_mode() {
        let config = AnonymizationConfig {
            date_mode: DateMode::Mask,
            ..AnonymizationConfig::default()
        };
        let registry = TransformRegistry::new(&config);
        assert_eq!(
            registry.apply("date", &SqlValue::from("2023-06-15")).unwrap(),
            SqlValue::from("2023-**-**")
        );
    }

    #[test]
    fn test_date_mask_rejects_typed_dates() {
        let registry = default_registry();
        let err = registry
            .apply("date:mask", &SqlValue::Date(date(2023, 6, 15)))
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnsupportedValue { ref operation, ref kind }
                if operation == "date:mask" && kind == "date"
        ));

        let ts = date(2023, 6, 15).and_hms_opt(8, 30, 0).unwrap();
        assert!(registry.apply("date:mask", &SqlValue::Timestamp(ts)).is_err());
    }

    #[test]
    fn test_custom_shift_days() {
        let config = AnonymizationConfig {
            date_shift_days: -1,
            ..AnonymizationConfig::default()
        };
        let registry = TransformRegistry::new(&config);
        assert_eq!(
            registry.apply("date:shift", &SqlValue::Date(date(2023, 3, 1))).unwrap(),
            SqlValue::Date(date(2023, 2, 28))
        );
    }

    #[test]
    fn test_null_passes_through() {
        let registry = default_registry();
        for op in ["email", "phone", "password", "address", "date", "date:mask"] {
            assert_eq!(registry.apply(op, &SqlValue::Null).unwrap(), SqlValue::Null);
        }
    }

    #[test]
    fn test_unknown_operation_passes_value_through() {
        let registry = default_registry();
        let value = SqlValue::from("keep me");

        assert_eq!(registry.apply("ssn", &value).unwrap(), value);
        assert_eq!(
            registry.transform("ssn", &value),
            Err(TransformError::UnknownOperation("ssn".to_string()))
        );
    }

    #[test]
    fn test_non_text_value_is_rejected() {
        let registry = default_registry();
        let err = registry.apply("phone", &SqlValue::Int(5551234)).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_invalid_date_text_is_rejected() {
        let registry = default_registry();
        let err = registry.apply("date", &"not a date".into()).unwrap_err();
        assert!(matches!(err, TransformError::InvalidDate { .. }));
    }

    #[test]
    fn test_register_extends_without_touching_dispatch() {
        let mut registry = default_registry();
        registry.register_text("name:initial", |s| {
            s.chars().next().map(|c| format!("{c}.")).unwrap_or_default()
        });

        assert!(registry.contains("name:initial"));
        assert_eq!(
            registry.apply("name:initial", &"Jane".into()).unwrap(),
            SqlValue::from("J.")
        );
    }

    #[test]
    fn test_alias_to_missing_target_fails() {
        let mut registry = TransformRegistry::empty();
        assert!(!registry.alias("email", "email:mask"));
        assert!(registry.names().is_empty());
    }
}
