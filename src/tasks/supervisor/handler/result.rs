use std::{process::ExitStatus, time::SystemTime};

use crate::tasks::{
    error::ExecError,
    event::{StopReason, StreamEvent, TerminateReason},
    result::ExecutionResult,
    state::ProcessState,
    supervisor::running::{Outcome, RunningProcess},
};

impl RunningProcess {
    /// Records the terminal state and releases the registry entry.
    pub(crate) fn finalize(&mut self) -> Outcome {
        let reason = match self.stop_reason() {
            Some(reason) => reason,
            None => {
                // Every exit path records a reason first
                let msg = "Process finished without a stop reason";
                #[cfg(feature = "tracing")]
                tracing::warn!(msg);
                StopReason::Error(ExecError::Wait(msg.to_string()))
            }
        };
        let state = reason.state();

        if state != ProcessState::Completed {
            // Anything that survived SIGTERM goes now
            #[allow(clippy::used_underscore_binding)]
            if let Err(_e) = self.context.group.kill_group() {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, "Failed to kill process group");
            }
        }
        for reader in &self.readers {
            reader.abort();
        }

        let exit_code = match state {
            ProcessState::Completed | ProcessState::Failed => {
                self.exit_status.and_then(|status| status.code())
            }
            _ => None,
        };
        let signal = self.exit_status.and_then(exit_signal);
        let error = match &reason {
            StopReason::Error(e) => Some(e.to_string()),
            StopReason::Terminated(TerminateReason::InternalError) => {
                Some("Terminated after an internal error".to_string())
            }
            _ => None,
        };

        if !self.context.finish(state) {
            #[cfg(feature = "tracing")]
            tracing::warn!(process_id = self.process_id(), "Terminal state already recorded");
        }
        self.registry.release(&self.context);
        self.finalized = true;

        #[cfg(feature = "tracing")]
        tracing::info!(process_id = self.process_id(), state = %state, exit_code = ?exit_code, "Process finished");

        Outcome {
            state,
            exit_code,
            signal,
            error,
            finished_at: SystemTime::now(),
        }
    }
}

impl Outcome {
    pub(crate) fn into_result(
        self,
        process_id: u32,
        started_at: SystemTime,
        lines: Vec<String>,
    ) -> ExecutionResult {
        ExecutionResult {
            process_id,
            exit_code: self.exit_code,
            signal: self.signal,
            lines,
            state: self.state,
            error: self.error,
            started_at,
            finished_at: self.finished_at,
        }
    }

    pub(crate) fn into_event(self, timeout_secs: u64) -> StreamEvent {
        match self.state {
            ProcessState::TimedOut => StreamEvent::TimedOut {
                seconds: timeout_secs,
            },
            ProcessState::Failed => StreamEvent::Error {
                message: self
                    .error
                    .unwrap_or_else(|| "Process failed".to_string()),
            },
            ProcessState::Killed => StreamEvent::Terminated {
                exit_code: None,
                killed: true,
            },
            ProcessState::Completed | ProcessState::Running => StreamEvent::Terminated {
                exit_code: self.exit_code,
                killed: false,
            },
        }
    }
}

fn exit_signal(status: ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.signal()
    }
    #[cfg(not(unix))]
    {
        let _ = status;
        None
    }
}
