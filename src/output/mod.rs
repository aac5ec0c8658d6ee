//! Output stages: the abstract sink contract plus the formatting handler
//! that drives it.
//!
//! The built-in sinks (console, file) can't cover every destination — the
//! `Sink` trait lets users bridge to anything that accepts text without
//! modifying tracklog itself.

mod console;
mod file;
mod handler;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use handler::OutputHandler;

use crate::channel::Channel;
use std::io;

/// Where formatted lines finally go.
///
/// A sink receives fully formatted text (margins, indentation, brackets
/// already applied) without a trailing newline decision of its own; the
/// output handler terminates lines. Write failures are swallowed upstream —
/// logging never crashes the host computation.
pub trait Sink: Send {
    /// Print a string without appending anything.
    ///
    /// `channels` is the canonical channel list of the originating record,
    /// or `None` for structural text (track brackets); most sinks ignore it.
    ///
    /// # Errors
    /// I/O errors from the underlying destination.
    fn print(&mut self, channels: Option<&[Channel]>, line: &str) -> io::Result<()>;

    /// Whether this sink can render ANSI escapes. Styling is dropped (not
    /// an error) when this is false.
    fn supports_ansi(&self) -> bool {
        false
    }

    /// Buffered sinks may lose tail data on abrupt exit without this.
    ///
    /// # Errors
    /// I/O errors from the underlying destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
