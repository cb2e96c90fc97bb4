use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;

use crate::tasks::{
    config::CommandSpec, error::ExecError, event::StreamEvent, executor::Executor,
    state::ProcessState,
    supervisor::integration_tests::{init_tracing, wait_until_dead},
};

#[tokio::test]
async fn cancel_buffered_execution() {
    init_tracing();
    let executor = Executor::new();
    let process = executor
        .start(CommandSpec::new("sleep 30").timeout_secs(60))
        .await
        .unwrap();
    let pid = process.process_id();
    let waiter = tokio::spawn(process.wait(Duration::from_secs(60)));

    executor.cancel(pid).unwrap();

    let result = timeout(Duration::from_secs(10), waiter)
        .await
        .expect("Cancelled process should finish")
        .unwrap();
    assert_eq!(result.state, ProcessState::Killed);
    assert_eq!(result.exit_code, None);
    assert!(!executor.registry().contains(pid));
}

#[tokio::test]
async fn cancel_stream_emits_killed_exit() {
    let executor = Executor::new();
    let mut stream = executor
        .execute_stream("echo ready; sleep 30", 60)
        .await
        .unwrap();

    let first = timeout(Duration::from_secs(5), stream.next()).await.unwrap();
    assert_eq!(first, Some(StreamEvent::Line("ready".to_string())));

    executor.cancel(stream.process_id()).unwrap();

    let last = timeout(Duration::from_secs(10), stream.next()).await.unwrap();
    assert_eq!(
        last,
        Some(StreamEvent::Terminated {
            exit_code: None,
            killed: true
        })
    );
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn second_cancel_is_not_found() {
    let executor = Executor::new();
    let process = executor
        .start(CommandSpec::new("sleep 30").timeout_secs(60))
        .await
        .unwrap();
    let pid = process.process_id();

    assert!(executor.cancel(pid).is_ok());
    assert_eq!(executor.cancel(pid), Err(ExecError::NotFound(pid)));

    let result = timeout(Duration::from_secs(10), process.wait(Duration::from_secs(60)))
        .await
        .unwrap();
    assert_eq!(result.state, ProcessState::Killed);
}

#[tokio::test]
async fn cancel_unknown_id() {
    let executor = Executor::new();
    assert_eq!(executor.cancel(u32::MAX), Err(ExecError::NotFound(u32::MAX)));
}

#[tokio::test]
async fn cancel_from_clone() {
    let executor = Executor::new();
    let other = executor.clone();
    let mut stream = executor.execute_stream("sleep 30", 60).await.unwrap();

    other.cancel(stream.process_id()).unwrap();

    let event = timeout(Duration::from_secs(10), stream.next()).await.unwrap();
    assert!(matches!(
        event,
        Some(StreamEvent::Terminated { killed: true, .. })
    ));
}

#[tokio::test]
async fn cancel_flooding_child_that_ignores_sigterm() {
    let executor = Executor::new();
    let mut stream = executor
        .execute_stream("trap '' TERM; yes", 60)
        .await
        .unwrap();

    let first = timeout(Duration::from_secs(5), stream.next()).await.unwrap();
    assert_eq!(first, Some(StreamEvent::Line("y".to_string())));

    let cancelled_at = std::time::Instant::now();
    executor.cancel(stream.process_id()).unwrap();

    let terminal = timeout(Duration::from_secs(8), async {
        while let Some(event) = stream.next().await {
            if event.is_terminal() {
                return event;
            }
            tokio::time::sleep(Duration::from_micros(200)).await;
        }
        panic!("stream ended without a terminal event");
    })
    .await
    .expect("Forced kill should end a chatty process");

    assert_eq!(
        terminal,
        StreamEvent::Terminated {
            exit_code: None,
            killed: true
        }
    );
    // Default grace of 2 s before SIGKILL
    assert!(cancelled_at.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn cancel_after_shell_exit_keeps_exit_code() {
    // Shell exits at once while the helper keeps the pipe open
    let executor = Executor::new();
    let process = executor
        .start(CommandSpec::new("sleep 30 & echo $!").timeout_secs(60))
        .await
        .unwrap();
    let pid = process.process_id();
    let waiter = tokio::spawn(process.wait(Duration::from_secs(60)));

    // Well inside the post-exit drain window
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(executor.cancel(pid).is_ok());

    let result = timeout(Duration::from_secs(5), waiter)
        .await
        .expect("Cancel should end the drain")
        .unwrap();
    assert_eq!(result.state, ProcessState::Completed);
    assert_eq!(result.exit_code, Some(0));
    assert_eq!(result.lines.len(), 1);

    let helper: i32 = result.lines[0].trim().parse().unwrap();
    assert!(wait_until_dead(helper, Duration::from_secs(5)).await);
}
