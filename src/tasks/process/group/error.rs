use thiserror::Error;

/// Failures while isolating or signalling a command's process group.
#[derive(Error, Debug)]
pub(crate) enum ProcessGroupError {
    #[error("Process id {0} cannot lead a process group")]
    InvalidProcessId(u32),

    #[error("No process has been placed in the group yet")]
    NotAssigned,

    #[cfg(unix)]
    #[error("Failed to send {signal} to process group {group}: {source}")]
    Signal {
        group: i32,
        signal: &'static str,
        #[source]
        source: nix::errno::Errno,
    },

    #[cfg(windows)]
    #[error("Job Object operation '{operation}' failed: {source}")]
    Job {
        operation: &'static str,
        #[source]
        source: windows::core::Error,
    },
}
