use std::fmt;

/// Lifecycle state of one supervised command.
///
/// A process enters `Running` only after a successful spawn and moves to
/// exactly one of the terminal states. No transition leaves a terminal state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProcessState {
    Running = 0,
    /// The shell exited on its own
    Completed = 1,
    /// The wall-clock timeout elapsed and the group was terminated
    TimedOut = 2,
    /// An explicit cancellation terminated the group
    Killed = 3,
    /// Reading output or waiting on the child failed
    Failed = 4,
}

impl ProcessState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProcessState::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessState::Running => "running",
            ProcessState::Completed => "completed",
            ProcessState::TimedOut => "timed_out",
            ProcessState::Killed => "killed",
            ProcessState::Failed => "failed",
        }
    }
}

impl From<u8> for ProcessState {
    fn from(value: u8) -> Self {
        match value {
            0 => ProcessState::Running,
            1 => ProcessState::Completed,
            2 => ProcessState::TimedOut,
            3 => ProcessState::Killed,
            _ => ProcessState::Failed,
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
