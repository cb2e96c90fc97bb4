use crate::tasks::{error::ExecError, state::ProcessState};

/// Events produced by a streaming execution.
///
/// Every stream yields zero or more `Line` events in the order the child
/// wrote them, followed by exactly one terminal event (`Terminated`,
/// `TimedOut` or `Error`). Nothing follows the terminal event.
///
/// # Examples
///
/// ```rust
/// use recon_exec::tasks::event::StreamEvent;
///
/// let event = StreamEvent::Line("22/tcp open ssh".to_string());
/// assert_eq!(event.to_sse(), "event: line\ndata: 22/tcp open ssh\n\n");
/// assert!(!event.is_terminal());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", content = "data"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One line of combined stdout/stderr, without its terminator
    #[cfg_attr(feature = "serde", serde(rename = "line"))]
    Line(String),

    /// The process ended, either on its own or through cancellation
    #[cfg_attr(feature = "serde", serde(rename = "exit"))]
    Terminated {
        /// Exit code, absent when the process was killed
        exit_code: Option<i32>,
        /// `true` when an explicit cancellation ended the process
        killed: bool,
    },

    /// The timeout elapsed and the process group was terminated
    #[cfg_attr(feature = "serde", serde(rename = "timeout"))]
    TimedOut { seconds: u64 },

    /// Reading output failed; the process group was terminated
    #[cfg_attr(feature = "serde", serde(rename = "error"))]
    Error { message: String },
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Line(_))
    }

    /// Name of the event as forwarded to push clients.
    pub fn event_name(&self) -> &'static str {
        match self {
            StreamEvent::Line(_) => "line",
            StreamEvent::Terminated { .. } => "exit",
            StreamEvent::TimedOut { .. } => "timeout",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// Payload of the event as forwarded to push clients.
    ///
    /// An exit event carries the exit code, `killed` for a cancelled process
    /// and `null` when the process died without a code.
    pub fn data(&self) -> String {
        match self {
            StreamEvent::Line(line) => line.clone(),
            StreamEvent::Terminated { killed: true, .. } => "killed".to_string(),
            StreamEvent::Terminated {
                exit_code: Some(code),
                ..
            } => code.to_string(),
            StreamEvent::Terminated { exit_code: None, .. } => "null".to_string(),
            StreamEvent::TimedOut { seconds } => seconds.to_string(),
            StreamEvent::Error { message } => message.clone(),
        }
    }

    /// Renders the event as one server-sent-events frame.
    ///
    /// Payloads spanning several lines are split across `data:` fields so the
    /// frame stays well formed.
    pub fn to_sse(&self) -> String {
        let mut frame = format!("event: {}\n", self.event_name());
        for part in self.data().split('\n') {
            frame.push_str("data: ");
            frame.push_str(part.strip_suffix('\r').unwrap_or(part));
            frame.push('\n');
        }
        frame.push('\n');
        frame
    }
}

/// Reason for terminating a running process group.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateReason {
    /// The process exceeded its timeout
    Timeout,

    /// A cancellation request named this process
    UserRequested,

    /// Output could not be read or the child could not be awaited
    InternalError,
}

/// Why a supervised process stopped. The first reason recorded wins.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StopReason {
    Finished,
    Terminated(TerminateReason),
    Error(ExecError),
}

impl StopReason {
    pub(crate) fn state(&self) -> ProcessState {
        match self {
            StopReason::Finished => ProcessState::Completed,
            StopReason::Terminated(TerminateReason::Timeout) => ProcessState::TimedOut,
            StopReason::Terminated(TerminateReason::UserRequested) => ProcessState::Killed,
            StopReason::Terminated(TerminateReason::InternalError) | StopReason::Error(_) => {
                ProcessState::Failed
            }
        }
    }
}
