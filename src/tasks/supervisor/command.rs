use std::process::Stdio;

use tokio::process::Command;

use crate::tasks::{config::CommandSpec, supervisor::Supervisor};

impl Supervisor {
    /// Builds the shell invocation for `spec`.
    ///
    /// On unix stderr is redirected onto the stdout pipe inside the child, so
    /// both streams arrive through one pipe in the order they were written.
    /// Elsewhere both pipes are captured and merged by arrival.
    pub(crate) fn setup_command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&self.options.shell);
        cmd.arg(&self.options.shell_flag);

        // cmd.exe does its own parsing, quoting the line would change it
        #[cfg(windows)]
        cmd.raw_arg(&spec.command);
        #[cfg(not(windows))]
        cmd.arg(&spec.command);

        cmd.kill_on_drop(true);

        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }
        if let Some(envs) = &spec.env {
            cmd.envs(envs);
        }

        cmd.stdin(Stdio::null()).stdout(Stdio::piped());

        #[cfg(unix)]
        {
            cmd.stderr(Stdio::null());
            merge_stderr_into_stdout(&mut cmd);
        }
        #[cfg(not(unix))]
        cmd.stderr(Stdio::piped());

        cmd
    }
}

#[cfg(unix)]
fn merge_stderr_into_stdout(cmd: &mut Command) {
    // SAFETY: dup2 is async-signal-safe and runs after stdio is wired up.
    unsafe {
        cmd.pre_exec(|| {
            if nix::libc::dup2(nix::libc::STDOUT_FILENO, nix::libc::STDERR_FILENO) == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}
