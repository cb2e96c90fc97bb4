use std::process::ExitStatus;

use crate::tasks::{
    error::ExecError,
    event::{StopReason, TerminateReason},
    supervisor::running::RunningProcess,
};

impl RunningProcess {
    pub(crate) fn handle_wait_result(&mut self, result: std::io::Result<ExitStatus>) {
        match result {
            Ok(status) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(process_id = self.process_id(), exit_code = ?status.code(), "Child process exited");
                self.exit_status = Some(status);
                self.context.set_stop_reason(StopReason::Finished);
            }
            Err(e) => {
                // Expected OS level error
                #[cfg(feature = "tracing")]
                tracing::error!(process_id = self.process_id(), error = %e, "Child process wait failed");
                self.context
                    .set_stop_reason(StopReason::Error(ExecError::Wait(e.to_string())));
                self.context
                    .request_termination(TerminateReason::InternalError);
            }
        }

        self.exited = true;
        self.escalate_at = None;
        // Descendants may still hold the pipe open
        if !self.output_closed {
            self.arm_settle();
        }
    }
}
