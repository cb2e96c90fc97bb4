use crate::tasks::{event::TerminateReason, supervisor::running::RunningProcess};

impl RunningProcess {
    pub(crate) fn handle_deadline(&mut self) {
        self.deadline_fired = true;

        #[cfg(feature = "tracing")]
        tracing::info!(process_id = self.process_id(), timeout_secs = self.timeout.as_secs(), "Process timed out");

        self.context.request_termination(TerminateReason::Timeout);
    }

    /// Stops waiting for output or exit that did not arrive within the grace
    /// period. Whatever still holds the pipe is killed.
    pub(crate) fn handle_settle_expired(&mut self) {
        self.settle_at = None;

        if !self.output_closed {
            #[cfg(feature = "tracing")]
            tracing::debug!(process_id = self.process_id(), "Output still open after exit, killing leftover processes");

            #[allow(clippy::used_underscore_binding)]
            if let Err(_e) = self.context.group.kill_group() {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, "Failed to kill process group");
            }
            self.output_closed = true;
        }
        if !self.exited {
            #[cfg(feature = "tracing")]
            tracing::warn!(process_id = self.process_id(), "Process did not exit after kill, giving up waiting");
            self.exited = true;
        }
    }
}
