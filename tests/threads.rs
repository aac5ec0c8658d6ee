//! Tests for threaded sessions and stream arbitration.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracklog::{Channel, Error, Logger, OutputHandler, Sink};

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

fn captured_logger() -> (Arc<Logger>, Capture) {
    let capture = Capture::default();
    let logger = Logger::new();
    logger
        .add_handler(Box::new(OutputHandler::new(capture.clone())))
        .unwrap();
    (Arc::new(logger), capture)
}

#[test]
fn each_thread_output_is_contiguous() {
    let (logger, capture) = captured_logger();
    logger.start_threads("work").unwrap();

    let mut workers = Vec::new();
    for worker in 0..3 {
        let logger = Arc::clone(&logger);
        workers.push(thread::spawn(move || {
            for i in 0..5 {
                logger.log(&[], format!("w{worker} step {i}"));
                thread::sleep(Duration::from_millis(2));
            }
            logger.finish_thread();
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }
    logger.end_threads("work").unwrap();

    let text = capture.text();
    for worker in 0..3 {
        let block: String = (0..5)
            .map(|i| format!("  w{worker} step {i}\n"))
            .collect();
        assert!(
            text.contains(&block),
            "worker {worker} output interleaved:\n{text}"
        );
    }
}

#[test]
fn session_renders_as_a_forced_track() {
    let (logger, capture) = captured_logger();
    logger.start_threads("batch").unwrap();
    logger.log(&[], "only record");
    logger.finish_thread();
    logger.end_threads("batch").unwrap();
    let text = capture.text();
    assert!(text.starts_with("Threads( batch ) "), "got {text:?}");
    assert!(text.contains("only record"), "got {text:?}");
}

#[test]
fn nested_sessions_are_rejected() {
    let (logger, _capture) = captured_logger();
    logger.start_threads("outer").unwrap();
    assert!(matches!(
        logger.start_threads("inner"),
        Err(Error::NestedSession)
    ));
    logger.finish_thread();
    logger.end_threads("outer").unwrap();
}

#[test]
fn finish_outside_session_warns_instead_of_failing() {
    let (logger, capture) = captured_logger();
    logger.finish_thread();
    assert!(
        capture
            .text()
            .contains("finish_thread() called outside of a threaded session")
    );
}

#[test]
fn tracks_inside_sessions_skip_title_checks() {
    let (logger, capture) = captured_logger();
    logger.start_threads("work").unwrap();
    let handle = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            logger.start_track(&[], "inner").unwrap();
            logger.log(&[], "payload");
            // closes with a different name; inside a session this is fine
            logger.end_track("whatever").unwrap();
            logger.finish_thread();
        })
    };
    handle.join().unwrap();
    logger.end_threads("work").unwrap();
    assert!(capture.text().contains("payload"));
}

#[test]
fn abandoned_backlogs_replay_at_session_end() {
    let (logger, capture) = captured_logger();
    logger.start_threads("work").unwrap();

    // the first thread takes the stream and never finishes; the second
    // thread's records park in its backlog
    let first = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            logger.log(&[], "owner record");
        })
    };
    first.join().unwrap();
    let second = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            logger.log(&[], "parked record");
        })
    };
    second.join().unwrap();

    assert!(!capture.text().contains("parked record"));
    logger.end_threads("work").unwrap();
    let text = capture.text();
    assert!(text.contains("parked record"), "got {text:?}");
    assert!(text.contains("never called finish_thread()"), "got {text:?}");
}
