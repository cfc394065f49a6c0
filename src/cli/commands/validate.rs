//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Veil configuration file.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::anonymization::TransformRegistry;
use crate::config::{load_config, VeilConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print!("{}", render_summary(&config));
        Ok(EXIT_OK)
    }
}

/// Human-readable configuration summary; the password is never printed
fn render_summary(config: &VeilConfig) -> String {
    let registry = TransformRegistry::new(&config.anonymization);
    let db = &config.database;
    let anon = &config.anonymization;

    let mut out = String::new();
    out.push_str("Configuration Summary:\n");
    out.push_str(&format!("  Log Level: {}\n", config.application.log_level));
    out.push_str(&format!("  Dry Run: {}\n", config.application.dry_run));
    out.push_str(&format!("  Database: {}\n", db.display_target()));
    out.push_str(&format!(
        "  User: {}\n",
        db.user.as_deref().unwrap_or("<unset>")
    ));
    out.push_str(&format!(
        "  Password: {}\n",
        if db.password.is_some() { "<redacted>" } else { "<unset>" }
    ));
    out.push_str(&format!("  SSL Mode: {}\n", db.ssl_mode));
    out.push_str(&format!("  Batch Size: {}\n", anon.batch_size));
    out.push_str(&format!("  Preview Rows: {}\n", anon.preview_rows));
    out.push_str(&format!(
        "  Strategy: {} (dates: {}, shift {} days)\n",
        anon.strategy, anon.date_mode, anon.date_shift_days
    ));
    out.push_str("  Tables:\n");
    for spec in &config.tables {
        out.push_str(&format!(
            "    - {} (primary key: {})\n",
            spec.table_name, spec.primary_key
        ));
        for op in &spec.column_operations {
            let note = if registry.contains(&op.operation) {
                ""
            } else {
                "  [unknown, values pass through]"
            };
            out.push_str(&format!("        {} -> {}{note}\n", op.column, op.operation));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::AnonymizationConfig;
    use crate::config::{
        secret_string, ApplicationConfig, DatabaseConfig, Dialect, LoggingConfig,
    };
    use crate::domain::TableAnonymizationSpec;

    #[test]
    fn test_summary_redacts_password() {
        let config = VeilConfig {
            application: ApplicationConfig::default(),
            database: DatabaseConfig {
                host: Some("db.internal".to_string()),
                user: Some("veil".to_string()),
                password: Some(secret_string("hunter2".to_string())),
                name: Some("anony".to_string()),
                ..DatabaseConfig::new(Dialect::MySql)
            },
            anonymization: AnonymizationConfig::default(),
            tables: vec![TableAnonymizationSpec::new("users")
                .with_column("email", "email")
                .with_column("nickname", "reverse")],
            logging: LoggingConfig::default(),
        };

        let summary = render_summary(&config);
        assert!(!summary.contains("hunter2"));
        assert!(summary.contains("Password: <redacted>"));
        assert!(summary.contains("mysql://db.internal:3306/anony"));
        assert!(summary.contains("email -> email\n"));
        assert!(summary.contains("nickname -> reverse  [unknown, values pass through]"));
    }

    #[tokio::test]
    async fn test_missing_file_returns_config_exit_code() {
        let code = ValidateArgs {}
            .execute("/nonexistent/veil.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
