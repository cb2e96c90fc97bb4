use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;

use crate::tasks::{
    config::CommandSpec, event::StreamEvent, executor::Executor, state::ProcessState,
    supervisor::integration_tests::wait_until_dead,
};

async fn collect(executor: &Executor, command: &str) -> Vec<StreamEvent> {
    let stream = executor.execute_stream(command, 10).await.unwrap();
    timeout(Duration::from_secs(10), stream.collect::<Vec<_>>())
        .await
        .expect("Stream should end")
}

#[tokio::test]
async fn lines_then_exit() {
    let executor = Executor::new();
    let events = collect(&executor, "printf 'a\\nb\\nc\\n'").await;

    assert_eq!(
        events,
        vec![
            StreamEvent::Line("a".to_string()),
            StreamEvent::Line("b".to_string()),
            StreamEvent::Line("c".to_string()),
            StreamEvent::Terminated {
                exit_code: Some(0),
                killed: false
            },
        ]
    );
}

#[tokio::test]
async fn matches_buffered_output() {
    let executor = Executor::new();
    let command = "echo one; echo two 1>&2; printf three";
    let buffered = executor.execute(command, 10).await.unwrap();
    let streamed: Vec<String> = collect(&executor, command)
        .await
        .into_iter()
        .filter_map(|event| match event {
            StreamEvent::Line(line) => Some(line),
            _ => None,
        })
        .collect();

    assert_eq!(buffered.lines, streamed);
}

#[tokio::test]
async fn exit_code_in_terminal_event() {
    let executor = Executor::new();
    let events = collect(&executor, "exit 7").await;
    assert_eq!(
        events,
        vec![StreamEvent::Terminated {
            exit_code: Some(7),
            killed: false
        }]
    );
}

#[tokio::test]
async fn exactly_one_terminal_event() {
    let executor = Executor::new();
    let events = collect(&executor, "seq 1 200").await;

    assert_eq!(events.len(), 201);
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert!(events.last().is_some_and(StreamEvent::is_terminal));
}

#[tokio::test]
async fn dropping_stream_kills_process() {
    let executor = Executor::new();
    let mut stream = executor
        .execute_stream("echo first; sleep 30", 60)
        .await
        .unwrap();
    let pid = stream.process_id();

    let first = timeout(Duration::from_secs(5), stream.next()).await.unwrap();
    assert_eq!(first, Some(StreamEvent::Line("first".to_string())));
    drop(stream);

    assert!(!executor.registry().contains(pid));
    assert!(wait_until_dead(pid as i32, Duration::from_secs(5)).await);
}

#[tokio::test]
async fn dropped_before_first_poll() {
    let executor = Executor::new();
    let stream = executor.execute_stream("sleep 30", 60).await.unwrap();
    let pid = stream.process_id();
    assert!(executor.registry().contains(pid));

    drop(stream);
    assert!(executor.registry().is_empty());
    assert!(wait_until_dead(pid as i32, Duration::from_secs(5)).await);
}

#[tokio::test]
async fn start_then_stream() {
    let executor = Executor::new();
    let process = executor
        .start(CommandSpec::new("true").timeout_secs(5))
        .await
        .unwrap();
    assert_eq!(process.state(), ProcessState::Running);
    let stream = process.into_stream();
    let events: Vec<_> = stream.collect().await;

    assert_eq!(
        events,
        vec![StreamEvent::Terminated {
            exit_code: Some(0),
            killed: false
        }]
    );
    assert!(executor.registry().is_empty());
}
