use chrono::Local;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tracklog::{Channel, Flag, Handler, Logger, OutputHandler, Payload, Record, Sink};

struct NullSink;

impl Sink for NullSink {
    fn print(&mut self, _channels: Option<&[Channel]>, _line: &str) -> std::io::Result<()> {
        Ok(())
    }
}

fn bench_handle_plain(c: &mut Criterion) {
    let mut handler = OutputHandler::new(NullSink);
    let record = Record::new(
        Payload::Text("application started successfully".to_string()),
        Vec::new(),
        2,
        Local::now(),
    );

    c.bench_function("OutputHandler::handle plain", |b| {
        b.iter(|| handler.handle(black_box(&record)).unwrap());
    });
}

fn bench_handle_with_margin(c: &mut Criterion) {
    let mut handler = OutputHandler::new(NullSink).with_left_margin(12);
    let record = Record::new(
        Payload::Text("connection timeout, retrying".to_string()),
        vec![Channel::Flag(Flag::Warn), Channel::name("net")],
        1,
        Local::now(),
    );

    c.bench_function("OutputHandler::handle with margin", |b| {
        b.iter(|| handler.handle(black_box(&record)).unwrap());
    });
}

fn bench_channel_sort(c: &mut Criterion) {
    c.bench_function("Record::channels sort", |b| {
        b.iter(|| {
            let record = Record::new(
                Payload::Text("m".to_string()),
                vec![
                    Channel::name("delta"),
                    Channel::Flag(Flag::Force),
                    Channel::name("alpha"),
                    Channel::Flag(Flag::Error),
                ],
                0,
                Local::now(),
            );
            black_box(record.channels().len())
        });
    });
}

fn bench_track_round_trip(c: &mut Criterion) {
    c.bench_function("Logger track round trip", |b| {
        let logger = Logger::new();
        logger
            .add_handler(Box::new(OutputHandler::new(NullSink)))
            .unwrap();
        b.iter(|| {
            logger.start_track(&[], "bench").unwrap();
            logger.log(&[], black_box("inside"));
            logger.end_track("bench").unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_handle_plain,
    bench_handle_with_margin,
    bench_channel_sort,
    bench_track_round_trip
);
criterion_main!(benches);
