//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use trailsync::client::ClientError;
use trailsync::config::ConfigFileError;
use trailsync::pipeline::{EventError, PipelineError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to construct a collaborator client
    ClientSetup(ClientError),
    /// Failed to read the event payload
    EventRead { source: String, error: std::io::Error },
    /// Event payload was not a valid webhook body
    Event(EventError),
    /// Pipeline run failed
    Pipeline(PipelineError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::ClientSetup(ClientError::Config(_)) => {
                eprintln!();
                eprintln!("Credentials can be set in the config file or the environment.");
                eprintln!("Run 'trailsync config path' to locate the config file.");
            }
            CliError::Pipeline(PipelineError::CacheSync { failures }) => {
                eprintln!();
                eprintln!("Failed categories:");
                for failure in failures {
                    eprintln!("  {}", failure);
                }
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ClientSetup(e) => write!(f, "Failed to create client: {}", e),
            CliError::EventRead { source, error } => {
                write!(f, "Failed to read event from '{}': {}", source, error)
            }
            CliError::Event(e) => write!(f, "{}", e),
            CliError::Pipeline(e) => write!(f, "Pipeline failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ClientSetup(e) => Some(e),
            CliError::EventRead { error, .. } => Some(error),
            CliError::Event(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        CliError::ClientSetup(e)
    }
}

impl From<EventError> for CliError {
    fn from(e: EventError) -> Self {
        CliError::Event(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
