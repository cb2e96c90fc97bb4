use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use futures::{
    Stream, StreamExt,
    stream::{self, BoxStream},
};

use crate::tasks::{
    event::StreamEvent,
    supervisor::running::{RunningProcess, Step},
};

/// Live event sequence of one execution.
///
/// Yields one [`StreamEvent::Line`] per output line, then exactly one
/// terminal event, then ends. Dropping the stream early kills the process
/// group.
pub struct ExecutionStream {
    process_id: u32,
    inner: BoxStream<'static, StreamEvent>,
}

impl ExecutionStream {
    /// Process id to pass to a cancellation request.
    pub fn process_id(&self) -> u32 {
        self.process_id
    }
}

impl fmt::Debug for ExecutionStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionStream")
            .field("process_id", &self.process_id)
            .finish_non_exhaustive()
    }
}

impl Stream for ExecutionStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl RunningProcess {
    /// Turns the process into a live event stream.
    ///
    /// The timeout is the one given in the process's
    /// [`CommandSpec`](crate::tasks::config::CommandSpec) and runs on the
    /// same clock as [`RunningProcess::wait`], so a child that stops
    /// producing output still times out.
    pub fn into_stream(self) -> ExecutionStream {
        let process_id = self.process_id();
        let timeout_secs = self.timeout.as_secs();

        let inner = stream::unfold(Some(self), move |process| async move {
            let mut process = process?;
            match process.next_step().await {
                Step::Line(line) => Some((StreamEvent::Line(line), Some(process))),
                Step::Finished(outcome) => Some((outcome.into_event(timeout_secs), None)),
            }
        })
        .boxed();

        ExecutionStream { process_id, inner }
    }
}
