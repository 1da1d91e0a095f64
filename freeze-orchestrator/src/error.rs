//! Error types for the trigger orchestrator

use freeze_client::ClientError;
use freeze_core::checkpoint::CheckpointError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Errors that abort a pipeline operation
///
/// Checkpoint write failures are not errors; they are reported in the
/// operation outcome instead.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A gateway call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A stored checkpoint could not be decoded
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

impl OrchestratorError {
    /// Name of the error class, as printed by the CLI
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Client(err) => err.kind(),
            Self::Checkpoint(_) => "CheckpointError",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client(err) if err.is_not_found())
    }
}
