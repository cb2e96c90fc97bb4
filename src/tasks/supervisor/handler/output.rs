use tokio::time::Instant;

use crate::tasks::{
    error::ExecError,
    event::{StopReason, TerminateReason},
    supervisor::running::RunningProcess,
};

impl RunningProcess {
    /// A read failure ends the execution as `Failed`; the group is
    /// terminated and no further output is read.
    pub(crate) fn handle_output_error(&mut self, error: std::io::Error) {
        #[cfg(feature = "tracing")]
        tracing::error!(process_id = self.process_id(), error = %error, "Failed to read process output");

        self.context
            .set_stop_reason(StopReason::Error(ExecError::StreamIo(error.to_string())));
        self.context
            .request_termination(TerminateReason::InternalError);
        self.output_closed = true;
        if self.exited {
            self.settle_at = None;
        }
    }

    pub(crate) fn handle_output_closed(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(process_id = self.process_id(), "Output closed");
        self.output_closed = true;
        if self.exited {
            self.settle_at = None;
        }
    }

    pub(crate) fn arm_settle(&mut self) {
        self.settle_at = Some(Instant::now() + self.grace);
    }
}
