//! Tests for TOML configuration and pipeline installation.

use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracklog::{Channel, Configuration, Error, Flag, Logger, OutputHandler, Pipeline, Sink};

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
fn standard_configuration_installs_two_stages() {
    let logger = Logger::new();
    Configuration::standard().apply(&logger).unwrap();
    assert_eq!(logger.handler_count(), 2);
}

#[test]
fn applying_replaces_previous_handlers() {
    let logger = Logger::new();
    Configuration::standard().apply(&logger).unwrap();
    Configuration::standard().apply(&logger).unwrap();
    assert_eq!(logger.handler_count(), 2);
}

#[test]
fn empty_configuration_clears_everything() {
    let logger = Logger::new();
    Configuration::standard().apply(&logger).unwrap();
    Configuration::empty().apply(&logger).unwrap();
    assert_eq!(logger.handler_count(), 0);
}

#[test]
fn toml_selects_the_output_sink() {
    let config = Configuration::from_toml(
        r#"
[log]
output = "stdout"
"#,
    )
    .unwrap();
    let logger = Logger::new();
    config.apply(&logger).unwrap();
    assert_eq!(logger.handler_count(), 2);
}

#[test]
fn toml_file_sink_writes_to_the_named_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let config = Configuration::from_toml(&format!(
        r#"
[log]
output = "file"
file = "{}"
"#,
        path.display()
    ))
    .unwrap();
    let logger = Logger::new();
    config.apply(&logger).unwrap();
    logger.log(&[], "to disk");
    logger.stop();
    assert_eq!(fs::read_to_string(&path).unwrap(), "to disk\n");
}

// registry factories are plain fn pointers, so the capturing sink for the
// TOML tests goes through a static buffer instead of a closure
static TOML_CAPTURE: Mutex<String> = Mutex::new(String::new());

struct StaticCapture;

impl Sink for StaticCapture {
    fn print(&mut self, _channels: Option<&[Channel]>, line: &str) -> std::io::Result<()> {
        TOML_CAPTURE.lock().unwrap().push_str(line);
        Ok(())
    }
}

#[test]
fn toml_debug_false_hides_debug_records() {
    let mut registry = tracklog::SinkRegistry::new();
    registry.register("static-capture", |_| {
        Ok(Box::new(OutputHandler::new(StaticCapture)))
    });
    let logger = Logger::new();
    Configuration::from_toml_with(
        r#"
[log]
output = "static-capture"

[channels]
debug = false
"#,
        &registry,
    )
    .unwrap()
    .apply(&logger)
    .unwrap();
    logger.log(&[Channel::Flag(Flag::Debug)], "hidden");
    logger.log(&[], "visible");
    assert_eq!(TOML_CAPTURE.lock().unwrap().as_str(), "visible\n");
}

#[test]
fn toml_rejects_unknown_keys() {
    let result = Configuration::from_toml(
        r#"
[log]
outptu = "stderr"
"#,
    );
    assert!(matches!(result, Err(Error::ConfigParse(_))));
}

#[test]
fn toml_rejects_unknown_sinks() {
    let result = Configuration::from_toml(
        r#"
[log]
output = "carrier-pigeon"
"#,
    );
    match result {
        Err(Error::UnknownSink(name)) => assert_eq!(name, "carrier-pigeon"),
        Err(other) => panic!("expected UnknownSink, got {other:?}"),
        Ok(_) => panic!("expected UnknownSink, got a configuration"),
    }
}

#[test]
fn registered_sinks_are_reachable_from_toml() {
    let mut registry = tracklog::SinkRegistry::new();
    registry.register("null", |_| {
        Ok(Box::new(OutputHandler::new(NullSink)))
    });
    let config = Configuration::from_toml_with(
        r#"
[log]
output = "null"
"#,
        &registry,
    )
    .unwrap();
    let logger = Logger::new();
    config.apply(&logger).unwrap();
    assert_eq!(logger.handler_count(), 2);
}

#[test]
fn branch_pipelines_feed_every_sink() {
    let first = Capture::default();
    let second = Capture::default();
    let logger = Logger::new();
    logger
        .install(Pipeline::branch(vec![
            Pipeline::sink(OutputHandler::new(first.clone())),
            Pipeline::sink(OutputHandler::new(second.clone())),
        ]))
        .unwrap();
    logger.log(&[], "everywhere");
    assert_eq!(first.text(), "everywhere\n");
    assert_eq!(second.text(), "everywhere\n");
}

#[test]
fn mutation_is_rejected_inside_a_track() {
    let logger = Logger::new();
    logger
        .add_handler(Box::new(OutputHandler::new(NullSink)))
        .unwrap();
    logger.start_track(&[], "open").unwrap();
    assert!(matches!(
        Configuration::standard().apply(&logger),
        Err(Error::MutationWithinTrack)
    ));
    logger.end_track("open").unwrap();
    Configuration::standard().apply(&logger).unwrap();
}

#[test]
fn toml_channel_width_reaches_output_stages() {
    let capture = Capture::default();
    let logger = Logger::new();
    logger
        .add_handler(Box::new(OutputHandler::new(capture.clone())))
        .unwrap();
    logger.set_channel_width(10);
    logger.log(&[Channel::Flag(Flag::Warn)], "wide");
    assert_eq!(capture.text(), "[WARN]      wide\n");
}

struct NullSink;

impl Sink for NullSink {
    fn print(&mut self, _channels: Option<&[Channel]>, _line: &str) -> std::io::Result<()> {
        Ok(())
    }
}
