use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU8, Ordering},
    },
    time::SystemTime,
};

use tokio::sync::oneshot;

use crate::tasks::{
    config::CommandSpec,
    event::{StopReason, TerminateReason},
    process::group::builder::ProcessGroup,
    state::ProcessState,
};

/// State shared between a [`RunningProcess`](super::running::RunningProcess)
/// and the registry entry that lets cancellation reach it.
#[derive(Debug)]
pub(crate) struct ProcessContext {
    pub(crate) process_id: u32,
    pub(crate) started_at: SystemTime,
    pub(crate) spec: Arc<CommandSpec>,
    pub(crate) group: ProcessGroup,
    state: AtomicU8,
    stop_reason: Mutex<Option<StopReason>>,
    terminate_tx: Mutex<Option<oneshot::Sender<TerminateReason>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProcessContext {
    pub(crate) fn new(
        process_id: u32,
        spec: Arc<CommandSpec>,
        group: ProcessGroup,
        terminate_tx: oneshot::Sender<TerminateReason>,
    ) -> Self {
        Self {
            process_id,
            started_at: SystemTime::now(),
            spec,
            group,
            state: AtomicU8::new(ProcessState::Running as u8),
            stop_reason: Mutex::new(None),
            terminate_tx: Mutex::new(Some(terminate_tx)),
        }
    }

    pub(crate) fn state(&self) -> ProcessState {
        self.state.load(Ordering::SeqCst).into()
    }

    /// Moves `Running` to `state`. Returns `false` if a terminal state was
    /// already recorded.
    pub(crate) fn finish(&self, state: ProcessState) -> bool {
        self.state
            .compare_exchange(
                ProcessState::Running as u8,
                state as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    pub(crate) fn stop_reason(&self) -> Option<StopReason> {
        lock(&self.stop_reason).clone()
    }

    /// Records `reason` unless an earlier one exists. Returns whether it was
    /// recorded.
    pub(crate) fn set_stop_reason(&self, reason: StopReason) -> bool {
        let mut guard = lock(&self.stop_reason);
        if guard.is_some() {
            return false;
        }
        *guard = Some(reason);
        true
    }

    /// Records the termination, signals the group and wakes the supervisor.
    ///
    /// Returns immediately; the supervisor observes the exit and escalates
    /// to a forced kill if the group outlives the grace period.
    pub(crate) fn request_termination(&self, reason: TerminateReason) {
        self.set_stop_reason(StopReason::Terminated(reason));

        #[allow(clippy::used_underscore_binding)]
        if let Err(_e) = self.group.terminate_group() {
            #[cfg(feature = "tracing")]
            tracing::warn!(process_id = self.process_id, error = %_e, "Failed to terminate process group");
        }

        if let Some(tx) = lock(&self.terminate_tx).take() {
            if tx.send(reason).is_err() {
                #[cfg(feature = "tracing")]
                tracing::debug!(terminate_reason = ?reason, "Supervisor already gone while sending terminate signal");
            }
        }
    }
}
