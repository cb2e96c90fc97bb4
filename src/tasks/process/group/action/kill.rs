use crate::tasks::process::group::{builder::ProcessGroup, error::ProcessGroupError};

impl ProcessGroup {
    /// Kills every process in the group outright.
    pub(crate) fn kill_group(&self) -> Result<(), ProcessGroupError> {
        #[cfg(unix)]
        {
            self.signal_group(nix::sys::signal::Signal::SIGKILL)
        }
        #[cfg(windows)]
        {
            use windows::Win32::System::JobObjects::TerminateJobObject;

            let job = self.job.as_ref().ok_or(ProcessGroupError::NotAssigned)?;
            unsafe { TerminateJobObject(job.0, 1) }.map_err(|source| ProcessGroupError::Job {
                operation: "TerminateJobObject",
                source,
            })
        }
    }
}
