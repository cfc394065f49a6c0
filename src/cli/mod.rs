//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Veil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Veil - in-place PII anonymization for database tables
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
#[command(author = "Veil Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "veil.toml", env = "VEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize the configured tables
    Run(commands::run::RunArgs),

    /// Wipe and reseed the demo tables
    Seed(commands::seed::SeedArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::run::RunMode;
    use crate::config::Dialect;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["veil", "run"]);
        assert_eq!(cli.config, "veil.toml");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.mode, RunMode::Live);
                assert!(args.dialect.is_none());
                assert!(!args.yes);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_run_with_flags() {
        let cli = Cli::parse_from([
            "veil", "run", "--mode", "test", "--dialect", "mysql", "--yes", "--dry-run",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.mode, RunMode::Test);
                assert_eq!(args.dialect, Some(Dialect::MySql));
                assert!(args.yes);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_dialect() {
        assert!(Cli::try_parse_from(["veil", "run", "--dialect", "oracle"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["veil", "--config", "custom.toml", "seed"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Seed(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["veil", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["veil", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }
}
