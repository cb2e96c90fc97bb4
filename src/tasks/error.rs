use thiserror::Error;

/// Errors surfaced by command execution.
///
/// Only [`ExecError::Spawn`] and [`ExecError::InvalidConfiguration`] abort an
/// execution before any output exists. Timeouts are not errors: they are
/// reported through [`crate::tasks::state::ProcessState::TimedOut`] together
/// with the partial output.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// The shell interpreter could not be launched
    #[error("Failed to spawn command: {0}")]
    Spawn(String),

    /// The command spec was rejected before spawning
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No running process is registered under this id
    #[error("No running process with id {0}")]
    NotFound(u32),

    /// Reading the child's output pipe failed mid-execution
    #[error("Output stream error: {0}")]
    StreamIo(String),

    /// Waiting on the child process failed at the OS level
    #[error("Failed to wait for child process: {0}")]
    Wait(String),
}
