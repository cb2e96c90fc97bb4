use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;

use crate::tasks::{
    event::StreamEvent,
    executor::Executor,
    state::ProcessState,
    supervisor::integration_tests::{init_tracing, process_alive, wait_until_dead},
};

// Backgrounds a grandchild and prints its pid
const TREE: &str = "sleep 30 & echo $!; wait";

async fn grandchild_pid(stream: &mut crate::tasks::mode::streaming::ExecutionStream) -> i32 {
    match timeout(Duration::from_secs(5), stream.next()).await.unwrap() {
        Some(StreamEvent::Line(line)) => line.trim().parse().expect("pid line"),
        other => panic!("expected pid line, got {:?}", other),
    }
}

#[tokio::test]
async fn cancel_kills_grandchild() {
    init_tracing();
    let executor = Executor::new();
    let mut stream = executor.execute_stream(TREE, 60).await.unwrap();
    let grandchild = grandchild_pid(&mut stream).await;
    assert!(process_alive(grandchild));

    executor.cancel(stream.process_id()).unwrap();
    let last = timeout(Duration::from_secs(10), stream.next()).await.unwrap();
    assert!(matches!(
        last,
        Some(StreamEvent::Terminated { killed: true, .. })
    ));

    assert!(wait_until_dead(grandchild, Duration::from_secs(5)).await);
}

#[tokio::test]
async fn timeout_kills_grandchild() {
    let executor = Executor::new();
    let mut stream = executor.execute_stream(TREE, 1).await.unwrap();
    let grandchild = grandchild_pid(&mut stream).await;

    let last = timeout(Duration::from_secs(10), stream.next()).await.unwrap();
    assert_eq!(last, Some(StreamEvent::TimedOut { seconds: 1 }));

    assert!(wait_until_dead(grandchild, Duration::from_secs(5)).await);
}

#[tokio::test]
async fn buffered_timeout_kills_tree() {
    let executor = Executor::new();
    let result = timeout(Duration::from_secs(10), executor.execute(TREE, 1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.state, ProcessState::TimedOut);
    let grandchild: i32 = result.lines[0].trim().parse().unwrap();
    assert!(wait_until_dead(grandchild, Duration::from_secs(5)).await);
    assert!(wait_until_dead(result.process_id as i32, Duration::from_secs(5)).await);
}

#[tokio::test]
async fn orphaned_helper_holding_pipe_is_cleaned_up() {
    // Shell exits at once, helper keeps stdout open
    let executor = Executor::new();
    let result = timeout(
        Duration::from_secs(15),
        executor.execute("sleep 30 & echo $!", 30),
    )
    .await
    .expect("Drain after exit should be bounded")
    .unwrap();

    assert_eq!(result.state, ProcessState::Completed);
    assert_eq!(result.exit_code, Some(0));
    let helper: i32 = result.lines[0].trim().parse().unwrap();
    assert!(wait_until_dead(helper, Duration::from_secs(5)).await);
}
