use std::{collections::HashMap, time::Duration};

use crate::tasks::error::ExecError;

/// Timeout applied when a spec does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// A shell command submitted for execution.
///
/// The command string is passed verbatim to the shell, so pipes, redirects
/// and quoting behave exactly as typed. Placeholders such as `{{target}}`
/// must already be substituted by the caller.
///
/// # Examples
///
/// ```rust
/// use recon_exec::tasks::config::CommandSpec;
///
/// let spec = CommandSpec::new("nmap -sV 10.0.0.1 | tee scan.txt").timeout_secs(600);
/// assert!(spec.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Shell-interpretable command line
    pub command: String,

    /// Maximum allowed runtime in seconds
    pub timeout_secs: u64,

    /// Working directory for the shell
    pub working_dir: Option<String>,

    /// Extra environment variables for the shell
    pub env: Option<HashMap<String, String>>,
}

impl Default for CommandSpec {
    fn default() -> Self {
        CommandSpec {
            command: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            working_dir: None,
            env: None,
        }
    }
}

impl CommandSpec {
    pub fn new(command: impl Into<String>) -> Self {
        CommandSpec {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env<K, V, I>(mut self, env: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.env = Some(env.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks the spec before anything is spawned.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::InvalidConfiguration`] when the command is blank,
    /// too long or contains a NUL byte, when the timeout is zero, when the
    /// working directory is missing, or when an environment key is malformed.
    pub fn validate(&self) -> Result<(), ExecError> {
        const MAX_COMMAND_LEN: usize = 16 * 1024;
        const MAX_WORKING_DIR_LEN: usize = 4096;
        const MAX_ENV_KEY_LEN: usize = 1024;
        const MAX_ENV_VALUE_LEN: usize = 32 * 1024;

        if self.command.trim().is_empty() {
            return Err(ExecError::InvalidConfiguration(
                "Command cannot be empty".to_string(),
            ));
        }
        if self.command.contains('\0') {
            return Err(ExecError::InvalidConfiguration(
                "Command cannot contain null bytes".to_string(),
            ));
        }
        if self.command.len() > MAX_COMMAND_LEN {
            return Err(ExecError::InvalidConfiguration(
                "Command length exceeds maximum allowed length".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ExecError::InvalidConfiguration(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if let Some(dir) = &self.working_dir {
            if dir.len() > MAX_WORKING_DIR_LEN {
                return Err(ExecError::InvalidConfiguration(
                    "Working directory path exceeds maximum length".to_string(),
                ));
            }
            let path = std::path::Path::new(dir);
            if !path.exists() {
                return Err(ExecError::InvalidConfiguration(format!(
                    "Working directory '{}' does not exist",
                    dir
                )));
            }
            if !path.is_dir() {
                return Err(ExecError::InvalidConfiguration(format!(
                    "Working directory '{}' is not a directory",
                    dir
                )));
            }
        }

        if let Some(env) = &self.env {
            for (k, v) in env {
                if k.is_empty() {
                    return Err(ExecError::InvalidConfiguration(
                        "Environment variable key cannot be empty".to_string(),
                    ));
                }
                if k.contains('=') || k.contains(' ') || k.contains('\0') {
                    return Err(ExecError::InvalidConfiguration(format!(
                        "Environment variable key '{}' contains an invalid character",
                        k
                    )));
                }
                if k.len() > MAX_ENV_KEY_LEN {
                    return Err(ExecError::InvalidConfiguration(format!(
                        "Environment variable key '{}' exceeds maximum length",
                        k
                    )));
                }
                if v.contains('\0') {
                    return Err(ExecError::InvalidConfiguration(format!(
                        "Environment variable '{}' value cannot contain null bytes",
                        k
                    )));
                }
                if v.len() > MAX_ENV_VALUE_LEN {
                    return Err(ExecError::InvalidConfiguration(format!(
                        "Environment variable '{}' value exceeds maximum length",
                        k
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Tuning knobs shared by every process a supervisor starts.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorOptions {
    /// Shell interpreter used to run every command
    pub shell: String,

    /// Flag telling the shell to run the next argument as a command line
    pub shell_flag: String,

    /// Time between the polite termination signal and the forced kill,
    /// also the longest time output is drained after the shell exits
    pub kill_grace_ms: u64,

    /// Capacity of the channel between a line reader and its consumer
    pub output_capacity: usize,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        #[cfg(windows)]
        let (shell, shell_flag) = ("cmd", "/C");
        #[cfg(not(windows))]
        let (shell, shell_flag) = ("sh", "-c");

        SupervisorOptions {
            shell: shell.to_string(),
            shell_flag: shell_flag.to_string(),
            kill_grace_ms: 2000,
            output_capacity: 1024,
        }
    }
}

impl SupervisorOptions {
    pub fn shell(mut self, shell: impl Into<String>, flag: impl Into<String>) -> Self {
        self.shell = shell.into();
        self.shell_flag = flag.into();
        self
    }

    pub fn kill_grace_ms(mut self, ms: u64) -> Self {
        self.kill_grace_ms = ms;
        self
    }

    pub fn output_capacity(mut self, capacity: usize) -> Self {
        self.output_capacity = capacity;
        self
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.kill_grace_ms)
    }
}
