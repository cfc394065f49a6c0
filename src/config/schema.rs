//! Configuration schema types
//!
//! This module defines the configuration structure for Veil.

use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::planner;
use crate::config::SecretString;
use crate::domain::{TableAnonymizationSpec, VeilError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// SQL dialect of the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL
    #[serde(alias = "postgresql")]
    Postgres,
    /// MySQL / MariaDB
    #[serde(alias = "mariadb")]
    MySql,
}

impl Dialect {
    /// Default TCP port of the database server
    pub fn default_port(&self) -> u16 {
        match self {
            Dialect::Postgres => 5432,
            Dialect::MySql => 3306,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = VeilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            other => Err(VeilError::Configuration(format!(
                "Database dialect '{other}' not supported. Must be one of: postgres, mysql"
            ))),
        }
    }
}

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Database connection settings
    pub database: DatabaseConfig,

    /// Pipeline and transform settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// Tables to anonymize, processed in this order
    #[serde(default)]
    pub tables: Vec<TableAnonymizationSpec>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VeilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.database.validate()?;
        self.anonymization.validate()?;
        self.logging.validate()?;

        if self.tables.is_empty() {
            return Err("At least one [[tables]] entry is required".to_string());
        }

        let mut seen = HashSet::new();
        for spec in &self.tables {
            if !seen.insert(spec.table_name.as_str()) {
                return Err(format!(
                    "Table '{}' is configured more than once",
                    spec.table_name
                ));
            }
            planner::check_spec(spec)?;
        }

        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (preview everything, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Database connection configuration
///
/// Host, user, password and name may be left out of the file and supplied
/// through `DATABASE_HOST`, `DATABASE_USER`, `DATABASE_PASSWORD` and
/// `DATABASE_NAME` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQL dialect (postgres or mysql)
    pub dialect: Dialect,

    /// Server host name
    #[serde(default)]
    pub host: Option<String>,

    /// Server port; defaults to the dialect's standard port
    #[serde(default)]
    pub port: Option<u16>,

    /// Login user
    #[serde(default)]
    pub user: Option<String>,

    /// Login password
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Database (schema) name
    #[serde(default)]
    pub name: Option<String>,

    /// TLS mode: disable, prefer or require
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Create a configuration for the given dialect with every optional field unset
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            host: None,
            port: None,
            user: None,
            password: None,
            name: None,
            ssl_mode: default_ssl_mode(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }

    /// Port to connect to, falling back to the dialect default
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.dialect.default_port())
    }

    /// Connection target without credentials, safe to log
    pub fn display_target(&self) -> String {
        format!(
            "{}://{}:{}/{}",
            self.dialect,
            self.host.as_deref().unwrap_or("?"),
            self.effective_port(),
            self.name.as_deref().unwrap_or("?")
        )
    }

    fn validate(&self) -> Result<(), String> {
        let required = [
            ("database.host", &self.host),
            ("database.user", &self.user),
            ("database.name", &self.name),
        ];
        for (field, value) in required {
            match value {
                Some(v) if !v.trim().is_empty() => {}
                _ => return Err(format!("{field} cannot be empty")),
            }
        }

        let valid_ssl_modes = ["disable", "prefer", "require"];
        if !valid_ssl_modes.contains(&self.ssl_mode.as_str()) {
            return Err(format!(
                "database.ssl_mode must be one of: {}, got '{}'",
                valid_ssl_modes.join(", "),
                self.ssl_mode
            ));
        }

        if self.connect_timeout_seconds == 0 {
            return Err("database.connect_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}

fn default_connect_timeout_seconds() -> u64 {
    30
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn database_config() -> DatabaseConfig {
        DatabaseConfig {
            host: Some("localhost".to_string()),
            user: Some("veil".to_string()),
            password: Some(secret_string("secret".to_string())),
            name: Some("anony".to_string()),
            ..DatabaseConfig::new(Dialect::Postgres)
        }
    }

    fn valid_config() -> VeilConfig {
        VeilConfig {
            application: ApplicationConfig::default(),
            database: database_config(),
            anonymization: AnonymizationConfig::default(),
            tables: vec![TableAnonymizationSpec::new("users").with_column("email", "email")],
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::MySql);

        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, VeilError::Configuration(_)));
    }

    #[test]
    fn test_database_config_requires_host_user_name() {
        assert!(database_config().validate().is_ok());

        let mut config = database_config();
        config.host = None;
        assert!(config.validate().is_err());

        let mut config = database_config();
        config.name = Some("  ".to_string());
        assert!(config.validate().is_err());

        let mut config = database_config();
        config.ssl_mode = "verify-full".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_port_uses_dialect_default() {
        let mut config = DatabaseConfig::new(Dialect::MySql);
        assert_eq!(config.effective_port(), 3306);
        config.port = Some(3307);
        assert_eq!(config.effective_port(), 3307);
    }

    #[test]
    fn test_display_target_hides_credentials() {
        let target = database_config().display_target();
        assert_eq!(target, "postgres://localhost:5432/anony");
        assert!(!target.contains("secret"));
    }

    #[test]
    fn test_veil_config_validation() {
        assert!(valid_config().validate().is_ok());

        let mut config = valid_config();
        config.tables.clear();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config
            .tables
            .push(TableAnonymizationSpec::new("users").with_column("phone", "phone"));
        let err = config.validate().unwrap_err();
        assert!(err.contains("more than once"));

        let mut config = valid_config();
        config.tables = vec![TableAnonymizationSpec::new("orders")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
