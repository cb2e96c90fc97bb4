use tokio::process::Command;

use crate::tasks::process::group::error::ProcessGroupError;

/// The process group a supervised shell runs in.
///
/// Call [`ProcessGroup::prepare`] on the command before spawning and
/// [`ProcessGroup::adopt`] with the child's id right after.
#[derive(Debug)]
pub(crate) struct ProcessGroup {
    #[cfg(unix)]
    pub(super) leader: Option<nix::unistd::Pid>,
    #[cfg(windows)]
    pub(super) job: Option<JobHandle>,
}

impl ProcessGroup {
    pub(crate) fn new() -> Self {
        Self {
            #[cfg(unix)]
            leader: None,
            #[cfg(windows)]
            job: None,
        }
    }

    /// Makes the spawned shell start a new session, so its pid is also the
    /// id of a fresh process group.
    #[cfg(unix)]
    pub(crate) fn prepare(&mut self, command: &mut Command) -> Result<(), ProcessGroupError> {
        // SAFETY: setsid is async-signal-safe and runs between fork and exec.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid()?;
                Ok(())
            });
        }
        Ok(())
    }

    /// Creates the Job Object the shell is assigned to after spawning.
    #[cfg(windows)]
    pub(crate) fn prepare(&mut self, _command: &mut Command) -> Result<(), ProcessGroupError> {
        self.job = Some(JobHandle::kill_on_close()?);
        Ok(())
    }

    #[cfg(unix)]
    pub(crate) fn adopt(&mut self, process_id: u32) -> Result<(), ProcessGroupError> {
        let raw = i32::try_from(process_id)
            .map_err(|_| ProcessGroupError::InvalidProcessId(process_id))?;
        self.leader = Some(nix::unistd::Pid::from_raw(raw));
        Ok(())
    }

    /// A grandchild forked before this call escapes the job.
    #[cfg(windows)]
    pub(crate) fn adopt(&mut self, process_id: u32) -> Result<(), ProcessGroupError> {
        use windows::Win32::{
            Foundation::CloseHandle,
            System::{
                JobObjects::AssignProcessToJobObject,
                Threading::{OpenProcess, PROCESS_SET_QUOTA, PROCESS_TERMINATE},
            },
        };

        let job = self.job.as_ref().ok_or(ProcessGroupError::NotAssigned)?;
        let process = unsafe { OpenProcess(PROCESS_SET_QUOTA | PROCESS_TERMINATE, false, process_id) }
            .map_err(|source| ProcessGroupError::Job {
                operation: "OpenProcess",
                source,
            })?;
        let assigned = unsafe { AssignProcessToJobObject(job.0, process) };
        unsafe {
            let _ = CloseHandle(process);
        }
        assigned.map_err(|source| ProcessGroupError::Job {
            operation: "AssignProcessToJobObject",
            source,
        })
    }
}

/// Owned Job Object handle, closed on drop. Closing it kills whatever is
/// still in the job.
#[cfg(windows)]
#[derive(Debug)]
pub(crate) struct JobHandle(pub(super) windows::Win32::Foundation::HANDLE);

// Job handles are only passed to thread-safe Win32 calls
#[cfg(windows)]
unsafe impl Send for JobHandle {}
#[cfg(windows)]
unsafe impl Sync for JobHandle {}

#[cfg(windows)]
impl JobHandle {
    fn kill_on_close() -> Result<Self, ProcessGroupError> {
        use windows::{
            Win32::System::JobObjects::{
                CreateJobObjectW, JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE,
                JOBOBJECT_EXTENDED_LIMIT_INFORMATION, JobObjectExtendedLimitInformation,
                SetInformationJobObject,
            },
            core::PCWSTR,
        };

        let handle = unsafe { CreateJobObjectW(None, PCWSTR::null()) }.map_err(|source| {
            ProcessGroupError::Job {
                operation: "CreateJobObjectW",
                source,
            }
        })?;
        // Wrap first so the handle is closed if configuring fails
        let job = Self(handle);

        let mut limits = JOBOBJECT_EXTENDED_LIMIT_INFORMATION::default();
        limits.BasicLimitInformation.LimitFlags = JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE;
        unsafe {
            SetInformationJobObject(
                job.0,
                JobObjectExtendedLimitInformation,
                std::ptr::from_ref(&limits).cast(),
                std::mem::size_of_val(&limits) as u32,
            )
        }
        .map_err(|source| ProcessGroupError::Job {
            operation: "SetInformationJobObject",
            source,
        })?;
        Ok(job)
    }
}

#[cfg(windows)]
impl Drop for JobHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = windows::Win32::Foundation::CloseHandle(self.0);
        }
    }
}
