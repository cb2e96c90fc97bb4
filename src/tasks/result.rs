use std::time::{Duration, SystemTime};

use crate::tasks::state::ProcessState;

/// Outcome of a buffered execution.
///
/// Produced once the process reached a terminal state. Output captured
/// before a timeout, a cancellation or a read failure is kept in `lines`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub process_id: u32,

    /// Exit code, absent when the process was killed or timed out
    pub exit_code: Option<i32>,

    /// Signal that ended the shell, unix only
    pub signal: Option<i32>,

    /// Combined stdout/stderr lines in arrival order
    pub lines: Vec<String>,

    pub state: ProcessState,

    /// Failure description when `state` is `Failed`
    pub error: Option<String>,

    pub started_at: SystemTime,
    pub finished_at: SystemTime,
}

impl ExecutionResult {
    /// All captured lines joined with `\n`.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    pub fn success(&self) -> bool {
        self.state == ProcessState::Completed && self.exit_code == Some(0)
    }

    pub fn duration(&self) -> Duration {
        self.finished_at
            .duration_since(self.started_at)
            .unwrap_or_default()
    }
}
