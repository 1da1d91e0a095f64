//! CLI error types
//!
//! Errors raised while turning flags and the credentials file into a run
//! configuration. Remote failures keep their own types from the library
//! crates.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for CLI setup
pub type Result<T> = std::result::Result<T, CliError>;

pub const COMMANDS: &[&str] = &["disable", "enable"];

#[derive(Debug, Error)]
pub enum CliError {
    /// Bad or contradictory input
    #[error("{0}")]
    Validation(String),

    /// A file the user pointed at does not exist
    #[error("{0}")]
    NotFound(String),

    #[error("Unable to read \"{path}\": {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Environment(String),
}

impl CliError {
    pub fn missing_command() -> Self {
        Self::Validation(format!(
            "Command has not been passed. Please use one of these: {}.",
            COMMANDS.join(", ")
        ))
    }

    pub fn unknown_command(command: &str) -> Self {
        Self::Validation(format!(
            "Unknown command: \"{}\". Please use one of these: {}.",
            command,
            COMMANDS.join(", ")
        ))
    }

    /// Name of the error class, as printed on failure
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::NotFound(_) => "NotFoundError",
            Self::Read { .. } | Self::Environment(_) => "Error",
        }
    }
}
