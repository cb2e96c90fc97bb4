use tokio::{sync::oneshot::error::RecvError, time::Instant};

use crate::tasks::{event::TerminateReason, supervisor::running::RunningProcess};

impl RunningProcess {
    /// The group already received SIGTERM. Stops reading new output and
    /// arms the forced kill.
    pub(crate) fn handle_terminate(&mut self, reason: Result<TerminateReason, RecvError>) {
        self.terminate_open = false;

        let Ok(_reason) = reason else {
            #[cfg(feature = "tracing")]
            tracing::warn!("Terminate channel closed unexpectedly");
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(process_id = self.process_id(), reason = ?_reason, "Terminate signal received");

        // Readers fail their next send; queued lines are still delivered
        self.output_rx.close();

        if !self.exited {
            self.escalate_at = Some(Instant::now() + self.grace);
        }
    }

    /// The group outlived the grace period after SIGTERM.
    pub(crate) fn handle_escalate(&mut self) {
        self.escalate_at = None;

        #[cfg(feature = "tracing")]
        tracing::warn!(process_id = self.process_id(), "Process group ignored termination, killing");

        #[allow(clippy::used_underscore_binding)]
        if let Err(_e) = self.context.group.kill_group() {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "Failed to kill process group");
        }
        #[allow(clippy::used_underscore_binding)]
        if let Err(_e) = self.child.start_kill() {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_e, "Child process already exited, nothing to kill");
        }
        self.arm_settle();
    }
}
