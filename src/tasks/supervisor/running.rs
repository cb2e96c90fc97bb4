use std::{
    process::ExitStatus,
    sync::Arc,
    time::{Duration, SystemTime},
};

use tokio::{
    process::Child,
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{Instant, sleep_until},
};

use crate::tasks::{
    config::CommandSpec,
    event::{StopReason, TerminateReason},
    process::{reader::OutputMessage, registry::ProcessRegistry},
    state::ProcessState,
    supervisor::context::ProcessContext,
};

/// A spawned command owned by exactly one consumer.
///
/// Consume it with [`RunningProcess::wait`] (buffered) or
/// [`RunningProcess::into_stream`] (streaming). Dropping it before it
/// reaches a terminal state kills the whole process group and removes it
/// from the registry.
#[derive(Debug)]
pub struct RunningProcess {
    pub(crate) context: Arc<ProcessContext>,
    pub(crate) child: Child,
    pub(crate) output_rx: mpsc::Receiver<OutputMessage>,
    pub(crate) terminate_rx: oneshot::Receiver<TerminateReason>,
    pub(crate) readers: Vec<JoinHandle<()>>,
    pub(crate) registry: ProcessRegistry,

    pub(crate) started: Instant,
    pub(crate) timeout: Duration,
    pub(crate) deadline: Instant,
    pub(crate) grace: Duration,

    /// Forced kill deadline, armed once termination was requested
    pub(crate) escalate_at: Option<Instant>,
    /// Bound on waiting for output or exit once the end is in sight
    pub(crate) settle_at: Option<Instant>,

    pub(crate) exit_status: Option<ExitStatus>,
    pub(crate) exited: bool,
    pub(crate) output_closed: bool,
    pub(crate) terminate_open: bool,
    pub(crate) deadline_fired: bool,
    pub(crate) finalized: bool,
}

/// One step of a running process as seen by an execution mode.
#[derive(Debug)]
pub(crate) enum Step {
    Line(String),
    Finished(Outcome),
}

/// Terminal facts about a process, produced once.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Outcome {
    pub(crate) state: ProcessState,
    pub(crate) exit_code: Option<i32>,
    pub(crate) signal: Option<i32>,
    pub(crate) error: Option<String>,
    pub(crate) finished_at: SystemTime,
}

/// What woke the supervision loop.
enum Wake {
    Output(Option<OutputMessage>),
    Exited(std::io::Result<ExitStatus>),
    Terminate(Result<TerminateReason, oneshot::error::RecvError>),
    Deadline,
    Escalate,
    Settle,
}

impl RunningProcess {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        context: Arc<ProcessContext>,
        child: Child,
        output_rx: mpsc::Receiver<OutputMessage>,
        terminate_rx: oneshot::Receiver<TerminateReason>,
        readers: Vec<JoinHandle<()>>,
        registry: ProcessRegistry,
        started: Instant,
        timeout: Duration,
        grace: Duration,
    ) -> Self {
        Self {
            context,
            child,
            output_rx,
            terminate_rx,
            readers,
            registry,
            started,
            timeout,
            deadline: started + timeout,
            grace,
            escalate_at: None,
            settle_at: None,
            exit_status: None,
            exited: false,
            output_closed: false,
            terminate_open: true,
            deadline_fired: false,
            finalized: false,
        }
    }

    /// OS process id of the shell, which is also its process group id.
    pub fn process_id(&self) -> u32 {
        self.context.process_id
    }

    pub fn started_at(&self) -> SystemTime {
        self.context.started_at
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.context.spec
    }

    pub fn state(&self) -> ProcessState {
        self.context.state()
    }

    /// Moves the deadline to `timeout` after the process started.
    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
        self.deadline = self.started + timeout;
    }

    /// Drives the process until the next output line or its terminal state.
    ///
    /// Lines are returned in arrival order; `Finished` comes only after the
    /// output is closed (or abandoned) and the shell has been awaited. Once
    /// termination is requested only lines already queued are returned.
    /// Once `Finished` has been returned the process must not be polled
    /// again.
    pub(crate) async fn next_step(&mut self) -> Step {
        loop {
            if self.exited && self.output_closed {
                return Step::Finished(self.finalize());
            }

            // Disabled branches are built but never polled
            let escalate_at = self.escalate_at.unwrap_or(self.deadline);
            let settle_at = self.settle_at.unwrap_or(self.deadline);
            // Control and timers come before output so a full channel cannot
            // starve them. Settle only fires while output is idle.
            let wake = tokio::select! {
                biased;
                reason = &mut self.terminate_rx, if self.terminate_open => Wake::Terminate(reason),
                () = sleep_until(self.deadline), if !self.deadline_fired => Wake::Deadline,
                () = sleep_until(escalate_at), if self.escalate_at.is_some() => Wake::Escalate,
                result = self.child.wait(), if !self.exited => Wake::Exited(result),
                message = self.output_rx.recv(), if !self.output_closed => Wake::Output(message),
                () = sleep_until(settle_at), if self.settle_at.is_some() => Wake::Settle,
            };

            match wake {
                Wake::Output(Some(OutputMessage::Line(line))) => return Step::Line(line),
                Wake::Output(Some(OutputMessage::Failed(e))) => self.handle_output_error(e),
                Wake::Output(None) => self.handle_output_closed(),
                Wake::Exited(result) => self.handle_wait_result(result),
                Wake::Terminate(reason) => self.handle_terminate(reason),
                Wake::Deadline => self.handle_deadline(),
                Wake::Escalate => self.handle_escalate(),
                Wake::Settle => self.handle_settle_expired(),
            }
        }
    }

    pub(crate) fn stop_reason(&self) -> Option<StopReason> {
        self.context.stop_reason()
    }
}

impl Drop for RunningProcess {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(process_id = self.context.process_id, "Process dropped while running, killing group");

        self.context
            .set_stop_reason(StopReason::Terminated(TerminateReason::UserRequested));
        #[allow(clippy::used_underscore_binding)]
        if let Err(_e) = self.context.group.kill_group() {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "Failed to kill process group on drop");
        }
        // The child itself is killed by kill_on_drop
        for reader in &self.readers {
            reader.abort();
        }
        self.context.finish(ProcessState::Killed);
        self.registry.release(&self.context);
    }
}
