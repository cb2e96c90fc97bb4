//! # recon-exec
//!
//! Runs command-line security scanners (network scanners, web fuzzers,
//! vulnerability scanners) as supervised child processes and hands their
//! output back either all at once or as a live event stream.
//!
//! ## Features
//!
//! - **Shell execution**: the command string goes to `sh -c` (`cmd /C` on
//!   windows) untouched, so pipes, redirects and quoting work as typed
//! - **Process groups**: every command runs in its own process group (Job
//!   Object on windows); timeouts and cancellation reach forked helpers too
//! - **Combined output**: stdout and stderr arrive as one ordered sequence
//!   of lines, and a trailing partial line is never dropped
//! - **Buffered or streaming**: wait for an [`ExecutionResult`] or forward
//!   [`StreamEvent`]s as server-sent events
//! - **Cancellation**: stop a running command by process id from anywhere
//!   that shares the [`ProcessRegistry`]
//!
//! ## Quick Start
//!
//! ```rust
//! use recon_exec::tasks::{executor::Executor, state::ProcessState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = Executor::new();
//!
//!     let result = executor.execute("echo open; echo filtered 1>&2", 60).await?;
//!     assert_eq!(result.state, ProcessState::Completed);
//!     for line in &result.lines {
//!         println!("{line}");
//!     }
//!
//!     let timed_out = executor.execute("sleep 5", 1).await?;
//!     assert_eq!(timed_out.state, ProcessState::TimedOut);
//!     assert_eq!(timed_out.exit_code, None);
//!     Ok(())
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `tracing` (default): structured logging through the `tracing` crate
//! - `serde`: serialization for specs, results and events
//!
//! [`ExecutionResult`]: tasks::result::ExecutionResult
//! [`StreamEvent`]: tasks::event::StreamEvent
//! [`ProcessRegistry`]: tasks::process::registry::ProcessRegistry

#[cfg(not(any(unix, windows)))]
compile_error!("recon-exec needs process groups, available on unix and windows only");

pub(crate) mod helper;
pub mod tasks;
