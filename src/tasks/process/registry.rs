use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::tasks::{event::TerminateReason, supervisor::context::ProcessContext};

/// Lookup table from an OS process id to the live process it belongs to.
///
/// The registry does not own the processes it lists: entries are inserted
/// when a command spawns and removed when it reaches a terminal state, so a
/// lookup after termination reports "not found" rather than a stale handle.
/// Clones share the same table.
///
/// # Examples
///
/// ```rust
/// use recon_exec::tasks::process::registry::ProcessRegistry;
///
/// let registry = ProcessRegistry::new();
/// assert!(registry.is_empty());
/// assert!(!registry.kill(4242));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    entries: Arc<Mutex<HashMap<u32, Arc<ProcessContext>>>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u32, Arc<ProcessContext>>> {
        // No invariant spans more than one map operation
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert(&self, context: Arc<ProcessContext>) {
        let previous = self.lock().insert(context.process_id, context);
        if previous.is_some() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Replaced a stale registry entry for a reused process id");
        }
    }

    /// Removes and returns the entry for `process_id`, if any.
    pub(crate) fn take(&self, process_id: u32) -> Option<Arc<ProcessContext>> {
        self.lock().remove(&process_id)
    }

    /// Removes `context` if it is still the entry for its process id.
    ///
    /// Removing an entry that is already gone is a no-op, and an entry that
    /// a newer process registered under a reused id is left alone.
    pub(crate) fn release(&self, context: &Arc<ProcessContext>) {
        let mut entries = self.lock();
        if entries
            .get(&context.process_id)
            .is_some_and(|current| Arc::ptr_eq(current, context))
        {
            entries.remove(&context.process_id);
        }
    }

    pub fn contains(&self, process_id: u32) -> bool {
        self.lock().contains_key(&process_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Ids of every process currently running.
    pub fn process_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.lock().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Signals the process group registered under `process_id`.
    ///
    /// Returns `false` when the id is unknown or already finished. The entry
    /// is removed right away, so a second call for the same id returns
    /// `false`. This does not wait for the process to die, and it does not
    /// change the outcome of a shell that had already exited.
    pub fn kill(&self, process_id: u32) -> bool {
        // Drop the lock before signalling
        let Some(context) = self.take(process_id) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(process_id, "Kill requested for unknown process");
            return false;
        };
        #[cfg(feature = "tracing")]
        tracing::info!(process_id, "Kill requested");
        context.request_termination(TerminateReason::UserRequested);
        true
    }
}
