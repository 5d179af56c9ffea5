//! Configuration management for the Taskdown validator.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project (`.taskdown.toml`) and user configuration files
//!
//! Precedence: command line, then project file, then user file, then defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::validation::ValidationOptions;

/// File name of the per-project configuration
pub const PROJECT_CONFIG_FILE: &str = ".taskdown.toml";

const DEFAULT_LOG_LEVEL: &str = "info";

/// How the command line reports results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Command-line arguments shared by `taskdown` and `taskdown-ls`
#[derive(Debug, Default, Parser)]
#[command(name = "taskdown")]
#[command(about = "Validate Taskdown task documents")]
#[command(version)]
pub struct Args {
    /// Files to validate (Markdown files are scanned for taskdown blocks)
    pub files: Vec<PathBuf>,

    /// Enable strict validation
    #[arg(long)]
    pub strict: bool,

    /// Explicit configuration file, replacing project and user files
    #[arg(long, help = "Path to a taskdown TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for validation results
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log level
    #[arg(long, help = "Log level (trace, debug, info, warn, error) [default: info]")]
    pub log_level: Option<String>,

    /// Accepted for compatibility with editors that launch servers with `--stdio`
    #[arg(long, hide = true)]
    pub stdio: bool,
}

/// Settings read from a TOML configuration file
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub strict: Option<bool>,
    pub log_level: Option<String>,
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Fill unset fields from a lower-priority file
    fn or(self, fallback: FileConfig) -> FileConfig {
        FileConfig {
            strict: self.strict.or(fallback.strict),
            log_level: self.log_level.or(fallback.log_level),
            format: self.format.or(fallback.format),
        }
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub files: Vec<PathBuf>,
    pub strict: bool,
    pub format: OutputFormat,
    pub log_level: String,
    /// Configuration files that were found and applied, highest priority first
    pub config_files: Vec<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments and the environment
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments, searching the current
    /// directory and the user config directory for files
    pub fn from_args(args: Args) -> Result<Self> {
        let project_dir = std::env::current_dir().context("Failed to read current directory")?;
        let user_dir = dirs::config_dir().map(|dir| dir.join("taskdown"));
        Self::from_args_with_dirs(args, &project_dir, user_dir.as_deref())
    }

    /// Create configuration with explicit search directories (useful for testing)
    pub fn from_args_with_dirs(
        args: Args,
        project_dir: &Path,
        user_config_dir: Option<&Path>,
    ) -> Result<Self> {
        let mut config_files = Vec::new();

        let file_config = match &args.config {
            Some(path) => {
                config_files.push(path.clone());
                FileConfig::load(path)?
            }
            None => {
                let mut merged = FileConfig::default();
                let candidates = [
                    Some(project_dir.join(PROJECT_CONFIG_FILE)),
                    user_config_dir.map(|dir| dir.join("config.toml")),
                ];
                for path in candidates.into_iter().flatten() {
                    if path.is_file() {
                        merged = merged.or(FileConfig::load(&path)?);
                        config_files.push(path);
                    }
                }
                merged
            }
        };

        for path in &config_files {
            log::debug!("Using config file {}", path.display());
        }

        Ok(Config {
            files: args.files,
            strict: args.strict || file_config.strict.unwrap_or(false),
            format: args.format.or(file_config.format).unwrap_or_default(),
            log_level: args
                .log_level
                .or(file_config.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            config_files,
        })
    }

    /// Whether any configuration file was applied
    pub fn has_config_file(&self) -> bool {
        !self.config_files.is_empty()
    }

    /// Validator options derived from this configuration
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions::new().strict(self.strict)
    }
}

/// Initialise `env_logger` on stderr; `RUST_LOG` overrides the configured level.
pub fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when embedded in tests
    let _ = env_logger::Builder::from_env(env).try_init();
}
