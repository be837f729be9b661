//! CLI runner for common setup.
//!
//! Encapsulates configuration loading, environment overrides and logging
//! initialization so command handlers only deal with their own work.

use std::path::Path;

use tracing::info;
use trailsync::config::ConfigFile;
use trailsync::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps the file writer flushing while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (default path unless `config_path` is given), apply
    /// environment overrides and initialize logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = load_config(config_path)?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("trailsync v{}", trailsync::VERSION);
        info!("trailsync CLI: {} command", command);
    }
}

/// Effective configuration: file values overlaid with environment variables.
pub fn load_config(config_path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let mut config = match config_path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    config.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}
