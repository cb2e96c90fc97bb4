use std::time::Duration;

use crate::{
    helper::tracing::MaybeInstrument,
    tasks::{
        result::ExecutionResult,
        supervisor::running::{RunningProcess, Step},
    },
};

impl RunningProcess {
    /// Collects every output line until the process reaches a terminal
    /// state, then returns them with that state.
    ///
    /// `timeout` counts from the moment the process started. When it elapses
    /// the process group is terminated and the result carries
    /// [`ProcessState::TimedOut`](crate::tasks::state::ProcessState::TimedOut)
    /// with the output captured so far. This never fails: cancellation,
    /// timeouts and read errors are all reported through the result state.
    pub async fn wait(mut self, timeout: Duration) -> ExecutionResult {
        self.set_timeout(timeout);
        let process_id = self.process_id();
        let started_at = self.started_at();

        async move {
            let mut lines = Vec::new();
            loop {
                match self.next_step().await {
                    Step::Line(line) => lines.push(line),
                    Step::Finished(outcome) => {
                        return outcome.into_result(process_id, started_at, lines);
                    }
                }
            }
        }
        .maybe_instrument("wait")
        .await
    }
}
