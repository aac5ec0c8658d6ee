//! Tests for error-trace capture and rendering.

use std::sync::{Arc, Mutex};
use tracklog::{Channel, ErrorTrace, Frame, Logger, OutputHandler, Sink};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<String>>);

impl Capture {
    fn text(&self) -> String {
        self.0.lock().unwrap().clone()
    }
}

impl Sink for Capture {
    fn print(&mut self, _channels: Option<&[Channel]>, line: &str) -> std::io::Result<()> {
        self.0.lock().unwrap().push_str(line);
        Ok(())
    }
}

#[test]
fn summary_then_frames_then_causes() {
    let trace = ErrorTrace::new("request failed")
        .with_frames(vec![
            Frame::new("fetch", "client.rs:41"),
            Frame::new("main", "main.rs:10"),
        ])
        .caused_by(ErrorTrace::new("connection refused"));
    let lines = trace.render_lines("  ");
    assert_eq!(
        lines,
        vec![
            "request failed".to_string(),
            "  fetch (client.rs:41)".to_string(),
            "  main (main.rs:10)".to_string(),
            "Caused by: connection refused".to_string(),
        ]
    );
}

#[test]
fn shared_frames_collapse_into_n_more() {
    let outer = ErrorTrace::new("wrapper").with_frames(vec![
        Frame::new("handle", "svc.rs:20"),
        Frame::new("serve", "svc.rs:8"),
        Frame::new("main", "main.rs:3"),
    ]);
    let inner = ErrorTrace::new("root cause").with_frames(vec![
        Frame::new("read", "io.rs:77"),
        Frame::new("handle", "svc.rs:20"),
        Frame::new("serve", "svc.rs:8"),
        Frame::new("main", "main.rs:3"),
    ]);
    // the cause repeats the wrapper's frames from `handle` down
    let lines = outer.caused_by(inner).render_lines("  ");
    assert_eq!(
        lines,
        vec![
            "wrapper".to_string(),
            "  handle (svc.rs:20)".to_string(),
            "  serve (svc.rs:8)".to_string(),
            "  main (main.rs:3)".to_string(),
            "Caused by: root cause".to_string(),
            "  read (io.rs:77)".to_string(),
            "  handle (svc.rs:20)".to_string(),
            "  ...2 more".to_string(),
        ]
    );
}

#[derive(Debug)]
struct Layer {
    msg: &'static str,
    source: Option<Box<dyn std::error::Error + 'static>>,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.msg)
    }
}

impl std::error::Error for Layer {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref()
    }
}

#[test]
fn from_error_keeps_deep_chains_in_order() {
    let err = Layer {
        msg: "request failed",
        source: Some(Box::new(Layer {
            msg: "connection reset",
            source: Some(Box::new(Layer {
                msg: "broken pipe",
                source: None,
            })),
        })),
    };
    let trace = ErrorTrace::from_error(&err);
    assert_eq!(trace.summary, "request failed");
    let first = trace.cause.as_ref().unwrap();
    assert_eq!(first.summary, "connection reset");
    let second = first.cause.as_ref().unwrap();
    assert_eq!(second.summary, "broken pipe");
    assert!(second.cause.is_none());
}

#[test]
fn from_error_walks_the_source_chain() {
    let root = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let wrapped = tracklog::Error::Io(root);
    let trace = ErrorTrace::from_error(&wrapped);
    assert_eq!(trace.summary, "I/O error: refused");
    assert_eq!(trace.cause.as_ref().unwrap().summary, "refused");
    assert!(trace.cause.as_ref().unwrap().cause.is_none());
}

#[test]
fn logged_traces_render_one_frame_per_line() {
    let capture = Capture::default();
    let logger = Logger::new();
    logger
        .add_handler(Box::new(OutputHandler::new(capture.clone())))
        .unwrap();
    let trace = ErrorTrace::new("boom")
        .with_frames(vec![Frame::new("explode", "bomb.rs:1")])
        .caused_by(ErrorTrace::new("short fuse"));
    logger.log(&[], trace);
    assert_eq!(
        capture.text(),
        "boom\n  explode (bomb.rs:1)\nCaused by: short fuse\n"
    );
}
