//! Console is the most common destination — immediate feedback on stdout or
//! stderr with no paths to configure.

use super::Sink;
use crate::channel::Channel;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes to one of the process's standard streams, flushing per print so
/// interleaved non-logging output stays ordered.
#[derive(Debug)]
pub struct ConsoleSink {
    stream: Stream,
}

impl ConsoleSink {
    #[must_use]
    pub const fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    #[must_use]
    pub const fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }
}

impl Sink for ConsoleSink {
    fn print(&mut self, _channels: Option<&[Channel]>, line: &str) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => {
                let mut out = io::stdout();
                out.write_all(line.as_bytes())?;
                out.flush()
            }
            Stream::Stderr => {
                let mut err = io::stderr();
                err.write_all(line.as_bytes())?;
                err.flush()
            }
        }
    }

    fn supports_ansi(&self) -> bool {
        true
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => io::stdout().flush(),
            Stream::Stderr => io::stderr().flush(),
        }
    }
}
