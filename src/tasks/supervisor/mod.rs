use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    time::Instant,
};

use crate::tasks::{
    config::{CommandSpec, SupervisorOptions},
    error::ExecError,
    event::TerminateReason,
    process::{
        group::builder::ProcessGroup,
        reader::{OutputMessage, spawn_line_reader},
        registry::ProcessRegistry,
    },
    supervisor::{context::ProcessContext, running::RunningProcess},
};

mod command;
pub(crate) mod context;
mod handler;
pub mod running;


/// Starts shell commands in their own process group and tracks them in a
/// [`ProcessRegistry`] so they can be cancelled by process id.
///
/// Cloning a supervisor is cheap; clones share the registry.
///
/// # Examples
///
/// ```rust
/// use recon_exec::tasks::{config::CommandSpec, supervisor::Supervisor};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let supervisor = Supervisor::default();
///     let process = supervisor.start(CommandSpec::new("echo ready").timeout_secs(10)).await?;
///     let pid = process.process_id();
///
///     let result = process.wait(std::time::Duration::from_secs(10)).await;
///     assert_eq!(result.lines, vec!["ready"]);
///     assert!(!supervisor.kill(pid));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Supervisor {
    pub(crate) registry: ProcessRegistry,
    pub(crate) options: SupervisorOptions,
}

impl Supervisor {
    pub fn new(registry: ProcessRegistry, options: SupervisorOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    pub fn options(&self) -> &SupervisorOptions {
        &self.options
    }

    /// Spawns `spec` through the shell and registers it.
    ///
    /// The returned process is `Running`; drive it with
    /// [`RunningProcess::wait`] or [`RunningProcess::into_stream`]. Must be
    /// called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// * [`ExecError::InvalidConfiguration`] if `spec` fails validation
    /// * [`ExecError::Spawn`] if the shell cannot be launched or placed in
    ///   its own group; nothing is registered in that case
    pub async fn start(&self, spec: CommandSpec) -> Result<RunningProcess, ExecError> {
        #[allow(clippy::used_underscore_binding)]
        if let Err(_e) = spec.validate() {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %_e, "Invalid command spec");
            return Err(_e);
        }
        let spec = Arc::new(spec);

        let mut group = ProcessGroup::new();
        let mut cmd = self.setup_command(&spec);
        group
            .prepare(&mut cmd)
            .map_err(|e| ExecError::Spawn(e.to_string()))?;

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %e, shell = %self.options.shell, "Failed to spawn command");
                return Err(ExecError::Spawn(e.to_string()));
            }
        };

        // A child without an id has already been reaped
        let Some(process_id) = child.id() else {
            let msg = "Failed to get process id";
            #[cfg(feature = "tracing")]
            tracing::error!(msg);
            return Err(ExecError::Spawn(msg.to_string()));
        };

        if let Err(e) = group.adopt(process_id) {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, process_id, "Failed to add process to group");
            // Dropping the child kills it
            return Err(ExecError::Spawn(e.to_string()));
        }

        let (output_tx, output_rx) = mpsc::channel::<OutputMessage>(self.options.output_capacity.max(1));
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_line_reader(stdout, output_tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_line_reader(stderr, output_tx.clone()));
        }
        // Output closes once every reader is done
        drop(output_tx);

        let (terminate_tx, terminate_rx) = oneshot::channel::<TerminateReason>();
        let context = Arc::new(ProcessContext::new(process_id, spec.clone(), group, terminate_tx));
        self.registry.insert(context.clone());

        #[cfg(feature = "tracing")]
        tracing::info!(process_id, command = %spec.command, timeout_secs = spec.timeout_secs, "Process started");

        Ok(RunningProcess::new(
            context,
            child,
            output_rx,
            terminate_rx,
            readers,
            self.registry.clone(),
            Instant::now(),
            spec.timeout(),
            self.options.kill_grace(),
        ))
    }

    /// Signals the process group registered under `process_id`.
    ///
    /// Returns `false` if no running process has that id.
    pub fn kill(&self, process_id: u32) -> bool {
        self.registry.kill(process_id)
    }
}
