//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VeilConfig;
use crate::config::secret_string;
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VeilConfig
/// 4. Applies environment variable overrides (VEIL_* prefix)
/// 5. Fills unset database fields from the bare DATABASE_* variables
/// 6. Validates the configuration
///
/// # Errors
///
/// Returns [`VeilError::Configuration`] if the file cannot be read or parsed,
/// a referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use veil::config::loader::load_config;
///
/// let config = load_config("veil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: VeilConfig = toml::from_str(&contents)
        .map_err(|e| VeilError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    fill_from_database_env(&mut config);

    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VeilError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VeilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using VEIL_* prefix
///
/// Environment variables follow the pattern: VEIL_<SECTION>_<KEY>
/// For example: VEIL_DATABASE_HOST, VEIL_ANONYMIZATION_BATCH_SIZE
fn apply_env_overrides(config: &mut VeilConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("VEIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("VEIL_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Database overrides
    if let Ok(val) = std::env::var("VEIL_DATABASE_DIALECT") {
        config.database.dialect = val.parse()?;
    }
    if let Ok(val) = std::env::var("VEIL_DATABASE_HOST") {
        config.database.host = Some(val);
    }
    if let Ok(val) = std::env::var("VEIL_DATABASE_PORT") {
        let port = val.parse().map_err(|_| {
            VeilError::Configuration(format!("Invalid VEIL_DATABASE_PORT value: {val}"))
        })?;
        config.database.port = Some(port);
    }
    if let Ok(val) = std::env::var("VEIL_DATABASE_USER") {
        config.database.user = Some(val);
    }
    if let Ok(val) = std::env::var("VEIL_DATABASE_PASSWORD") {
        config.database.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("VEIL_DATABASE_NAME") {
        config.database.name = Some(val);
    }

    // Anonymization overrides
    if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_BATCH_SIZE") {
        if let Ok(size) = val.parse() {
            config.anonymization.batch_size = size;
        }
    }
    if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_DATE_SHIFT_DAYS") {
        if let Ok(days) = val.parse() {
            config.anonymization.date_shift_days = days;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Fills database fields the file left unset from DATABASE_HOST,
/// DATABASE_USER, DATABASE_PASSWORD and DATABASE_NAME
fn fill_from_database_env(config: &mut VeilConfig) {
    let db = &mut config.database;
    if db.host.is_none() {
        db.host = std::env::var("DATABASE_HOST").ok();
    }
    if db.user.is_none() {
        db.user = std::env::var("DATABASE_USER").ok();
    }
    if db.password.is_none() {
        db.password = std::env::var("DATABASE_PASSWORD").ok().map(secret_string);
    }
    if db.name.is_none() {
        db.name = std::env::var("DATABASE_NAME").ok();
    }
}
