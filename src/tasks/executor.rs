use crate::tasks::{
    config::{CommandSpec, SupervisorOptions},
    error::ExecError,
    mode::streaming::ExecutionStream,
    process::registry::ProcessRegistry,
    result::ExecutionResult,
    supervisor::{Supervisor, running::RunningProcess},
};

/// Entry point used by the surrounding service layer.
///
/// Wraps a [`Supervisor`] with the three operations a caller needs: run a
/// command to completion, stream its output, and cancel it by process id.
/// Clones share one registry, so a cancellation issued from one clone
/// reaches a process started from another.
///
/// # Examples
///
/// ## Buffered
/// ```rust
/// use recon_exec::tasks::{executor::Executor, state::ProcessState};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let executor = Executor::new();
///     let result = executor.execute("printf 'a\\nb\\n'", 30).await?;
///     assert_eq!(result.state, ProcessState::Completed);
///     assert_eq!(result.exit_code, Some(0));
///     assert_eq!(result.output(), "a\nb");
///     Ok(())
/// }
/// ```
///
/// ## Streaming
/// ```rust
/// use futures::StreamExt;
/// use recon_exec::tasks::{event::StreamEvent, executor::Executor};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let executor = Executor::new();
///     let mut stream = executor.execute_stream("echo scanning", 30).await?;
///     while let Some(event) = stream.next().await {
///         print!("{}", event.to_sse());
///         if let StreamEvent::Terminated { exit_code, .. } = event {
///             assert_eq!(exit_code, Some(0));
///         }
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Executor {
    supervisor: Supervisor,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SupervisorOptions) -> Self {
        Self {
            supervisor: Supervisor::new(ProcessRegistry::new(), options),
        }
    }

    pub fn from_supervisor(supervisor: Supervisor) -> Self {
        Self { supervisor }
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    pub fn registry(&self) -> &ProcessRegistry {
        self.supervisor.registry()
    }

    /// Starts `spec` and hands back the running process, so the caller can
    /// learn its process id before choosing a mode.
    ///
    /// # Errors
    ///
    /// See [`Supervisor::start`].
    pub async fn start(&self, spec: CommandSpec) -> Result<RunningProcess, ExecError> {
        self.supervisor.start(spec).await
    }

    /// Runs `command` to completion and returns all of its output.
    ///
    /// # Errors
    ///
    /// Fails only when the command cannot be started. Timeouts and
    /// cancellations are reported through [`ExecutionResult::state`].
    pub async fn execute(
        &self,
        command: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<ExecutionResult, ExecError> {
        self.execute_spec(CommandSpec::new(command).timeout_secs(timeout_secs))
            .await
    }

    /// Same as [`Executor::execute`] for a fully built spec.
    ///
    /// # Errors
    ///
    /// Fails only when the command cannot be started.
    pub async fn execute_spec(&self, spec: CommandSpec) -> Result<ExecutionResult, ExecError> {
        let timeout = spec.timeout();
        let process = self.supervisor.start(spec).await?;
        Ok(process.wait(timeout).await)
    }

    /// Runs `command` and returns its live event stream.
    ///
    /// # Errors
    ///
    /// Fails only when the command cannot be started; every later failure
    /// is delivered as the stream's terminal event.
    pub async fn execute_stream(
        &self,
        command: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<ExecutionStream, ExecError> {
        self.execute_stream_spec(CommandSpec::new(command).timeout_secs(timeout_secs))
            .await
    }

    /// Same as [`Executor::execute_stream`] for a fully built spec.
    ///
    /// # Errors
    ///
    /// Fails only when the command cannot be started.
    pub async fn execute_stream_spec(
        &self,
        spec: CommandSpec,
    ) -> Result<ExecutionStream, ExecError> {
        let process = self.supervisor.start(spec).await?;
        Ok(process.into_stream())
    }

    /// Terminates the process group registered under `process_id`.
    ///
    /// Returns as soon as the group has been signalled; the execution that
    /// owns the process reports it as killed.
    ///
    /// A process stays registered until its output is drained, so a cancel
    /// can land after the shell already exited on its own. That execution
    /// still reports `Completed` with the real exit code, and whatever
    /// output was not yet queued is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NotFound`] if no running process has that id,
    /// including one that was already cancelled.
    pub fn cancel(&self, process_id: u32) -> Result<(), ExecError> {
        if self.supervisor.kill(process_id) {
            Ok(())
        } else {
            Err(ExecError::NotFound(process_id))
        }
    }
}
