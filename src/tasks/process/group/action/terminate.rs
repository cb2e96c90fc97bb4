use crate::tasks::process::group::{builder::ProcessGroup, error::ProcessGroupError};

impl ProcessGroup {
    /// Asks every process in the group to exit with SIGTERM.
    ///
    /// Windows has no polite group signal, so there this is
    /// [`ProcessGroup::kill_group`].
    pub(crate) fn terminate_group(&self) -> Result<(), ProcessGroupError> {
        #[cfg(unix)]
        {
            self.signal_group(nix::sys::signal::Signal::SIGTERM)
        }
        #[cfg(windows)]
        {
            self.kill_group()
        }
    }

    /// Sends `signal` to the whole group. A group with no members left
    /// counts as signalled.
    #[cfg(unix)]
    pub(super) fn signal_group(
        &self,
        signal: nix::sys::signal::Signal,
    ) -> Result<(), ProcessGroupError> {
        use nix::{errno::Errno, sys::signal::killpg};

        let leader = self.leader.ok_or(ProcessGroupError::NotAssigned)?;
        match killpg(leader, signal) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(source) => Err(ProcessGroupError::Signal {
                group: leader.as_raw(),
                signal: signal.as_str(),
                source,
            }),
        }
    }
}
