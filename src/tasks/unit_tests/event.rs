use crate::tasks::event::StreamEvent;

#[test]
fn only_line_is_not_terminal() {
    assert!(!StreamEvent::Line("x".to_string()).is_terminal());
    assert!(
        StreamEvent::Terminated {
            exit_code: Some(0),
            killed: false
        }
        .is_terminal()
    );
    assert!(StreamEvent::TimedOut { seconds: 5 }.is_terminal());
    assert!(
        StreamEvent::Error {
            message: "boom".to_string()
        }
        .is_terminal()
    );
}

#[test]
fn event_names() {
    assert_eq!(StreamEvent::Line(String::new()).event_name(), "line");
    assert_eq!(
        StreamEvent::Terminated {
            exit_code: None,
            killed: true
        }
        .event_name(),
        "exit"
    );
    assert_eq!(StreamEvent::TimedOut { seconds: 1 }.event_name(), "timeout");
    assert_eq!(
        StreamEvent::Error {
            message: String::new()
        }
        .event_name(),
        "error"
    );
}

#[test]
fn exit_data() {
    let exited = StreamEvent::Terminated {
        exit_code: Some(2),
        killed: false,
    };
    assert_eq!(exited.data(), "2");

    let killed = StreamEvent::Terminated {
        exit_code: None,
        killed: true,
    };
    assert_eq!(killed.data(), "killed");

    let signalled = StreamEvent::Terminated {
        exit_code: None,
        killed: false,
    };
    assert_eq!(signalled.data(), "null");
}

#[test]
fn sse_frames() {
    assert_eq!(
        StreamEvent::Line("80/tcp open http".to_string()).to_sse(),
        "event: line\ndata: 80/tcp open http\n\n"
    );
    assert_eq!(
        StreamEvent::TimedOut { seconds: 300 }.to_sse(),
        "event: timeout\ndata: 300\n\n"
    );
    assert_eq!(
        StreamEvent::Terminated {
            exit_code: Some(0),
            killed: false
        }
        .to_sse(),
        "event: exit\ndata: 0\n\n"
    );
}

#[test]
fn sse_splits_multiline_payload() {
    let event = StreamEvent::Error {
        message: "first\r\nsecond".to_string(),
    };
    assert_eq!(event.to_sse(), "event: error\ndata: first\ndata: second\n\n");
}

#[test]
fn sse_empty_line_still_has_data_field() {
    assert_eq!(
        StreamEvent::Line(String::new()).to_sse(),
        "event: line\ndata: \n\n"
    );
}

#[cfg(feature = "serde")]
#[test]
fn serialize_tagged() {
    let json = serde_json::to_value(StreamEvent::Line("hello".to_string())).unwrap();
    assert_eq!(json, serde_json::json!({"event": "line", "data": "hello"}));

    let json = serde_json::to_value(StreamEvent::TimedOut { seconds: 9 }).unwrap();
    assert_eq!(json, serde_json::json!({"event": "timeout", "data": {"seconds": 9}}));
}
