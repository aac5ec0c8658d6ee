//! Tests for channel ordering and the channel handle.

use chrono::Local;
use std::sync::{Arc, Mutex};
use tracklog::{Channel, Flag, Logger, OutputHandler, Payload, Record, Sink};

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
fn canonical_order_is_force_flags_then_alphabetical() {
    let record = Record::new(
        Payload::Text("m".to_string()),
        vec![
            Channel::name("alpha"),
            Channel::Flag(Flag::Force),
            Channel::Flag(Flag::Error),
            Channel::name("beta"),
        ],
        0,
        Local::now(),
    );
    let ordered: Vec<String> = record.channels().iter().map(ToString::to_string).collect();
    assert_eq!(ordered, ["FORCE", "ERROR", "alpha", "beta"]);
}

#[test]
fn channel_order_is_computed_once() {
    let record = Record::new(
        Payload::Text("m".to_string()),
        vec![Channel::name("b"), Channel::name("a")],
        0,
        Local::now(),
    );
    let first = record.channels().as_ptr();
    let second = record.channels().as_ptr();
    assert_eq!(first, second);
}

#[test]
fn force_flag_is_detected_from_any_position() {
    let record = Record::new(
        Payload::Text("m".to_string()),
        vec![Channel::name("zzz"), Channel::Flag(Flag::Force)],
        0,
        Local::now(),
    );
    assert!(record.force());
}

#[test]
fn handle_attaches_channels_to_every_record() {
    let capture = Capture::default();
    let logger = Logger::new();
    logger
        .add_handler(Box::new(
            OutputHandler::new(capture.clone()).with_left_margin(12),
        ))
        .unwrap();
    let net = logger.channels(&[Channel::name("net")]);
    net.log("connected");
    net.log("closed");
    let text = capture.text();
    assert_eq!(text.matches("[net").count(), 2, "got {text:?}");
}

#[test]
fn handle_stacks_additional_channels() {
    let capture = Capture::default();
    let logger = Logger::new();
    logger
        .add_handler(Box::new(
            OutputHandler::new(capture.clone()).with_left_margin(16),
        ))
        .unwrap();
    logger
        .channels(&[Channel::name("net")])
        .channels(&[Channel::name("tls")])
        .log("handshake");
    let text = capture.text();
    assert!(text.contains("net tls"), "got {text:?}");
}

#[test]
fn flag_round_trips_through_parse() {
    assert_eq!("warn".parse::<Flag>().unwrap(), Flag::Warn);
    assert_eq!("ERR".parse::<Flag>().unwrap(), Flag::Error);
    assert!("nope".parse::<Flag>().is_err());
}
