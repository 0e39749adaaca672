//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Session command could not be parsed
    #[error("Invalid command '{input}': {message}")]
    InvalidCommand { input: String, message: String },

    /// `trigger` named an event missing from the configuration
    #[error("Unknown event '{name}' (use `event <text>` for ad-hoc events)")]
    UnknownEvent { name: String },

    /// Dispatcher misuse (duplicate / unknown subscriber)
    #[error(transparent)]
    Dispatcher(#[from] dispatcher::DispatcherError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_command(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCommand {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent { name: name.into() }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
