//! The immutable unit of log data, carrying everything a stage needs to
//! eventually render the enclosed message.

mod trace;

pub use trace::{ErrorTrace, Frame};

use crate::channel::Channel;
use chrono::{DateTime, Local};
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::thread::ThreadId;

/// The content of a record: plain text, a supplier evaluated only if the
/// record is actually rendered, or a captured error trace.
#[derive(Clone)]
pub enum Payload {
    Text(String),
    /// Evaluated at render time, so expensive formatting is skipped for
    /// records that every sink filters out.
    Lazy(Arc<dyn Fn() -> String + Send + Sync>),
    Trace(ErrorTrace),
}

impl Payload {
    /// A lazily-evaluated payload.
    pub fn lazy(supplier: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Lazy(Arc::new(supplier))
    }

    /// The payload as a single display string; lazy payloads are evaluated,
    /// traces reduce to their summary line.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Lazy(f) => f(),
            Self::Trace(t) => t.summary.clone(),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
            Self::Trace(t) => f.debug_tuple("Trace").field(t).finish(),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<ErrorTrace> for Payload {
    fn from(trace: ErrorTrace) -> Self {
        Self::Trace(trace)
    }
}

impl From<fmt::Arguments<'_>> for Payload {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Self::Text(args.to_string())
    }
}

/// One logged event.
///
/// Content, channels, depth, and timestamp never change after construction;
/// only the cached canonical channel order is computed, once, on first read.
#[derive(Debug, Clone)]
pub struct Record {
    /// What was logged.
    pub content: Payload,
    channels: Vec<Channel>,
    sorted: OnceLock<Vec<Channel>>,
    /// Nesting depth at creation time.
    pub depth: usize,
    /// Logical creation time.
    pub timestamp: DateTime<Local>,
    /// The logical thread that produced this record.
    pub thread: ThreadId,
}

impl Record {
    /// Captures the calling thread as the record's producer.
    #[must_use]
    pub fn new(
        content: Payload,
        channels: Vec<Channel>,
        depth: usize,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self::with_thread(content, channels, depth, timestamp, std::thread::current().id())
    }

    /// Deferred actions replay on whichever thread owns the stream, so the
    /// arbiter supplies the original producer explicitly.
    #[must_use]
    pub fn with_thread(
        content: Payload,
        channels: Vec<Channel>,
        depth: usize,
        timestamp: DateTime<Local>,
        thread: ThreadId,
    ) -> Self {
        Self {
            content,
            channels,
            sorted: OnceLock::new(),
            depth,
            timestamp,
            thread,
        }
    }

    /// The record's channels in canonical order: `FORCE` first, then the
    /// other flags, then everything else alphabetically. Sorted at most
    /// once per record.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        self.sorted.get_or_init(|| {
            let mut sorted = self.channels.clone();
            sorted.sort_by(Channel::order);
            sorted
        })
    }

    /// True iff this record carries the reserved `FORCE` marker, bypassing
    /// visibility filtering and lazy track suppression.
    #[must_use]
    pub fn force(&self) -> bool {
        self.channels().first().is_some_and(Channel::is_force)
    }

    /// The content as a single display string (track titles, summaries).
    #[must_use]
    pub fn content_text(&self) -> String {
        self.content.to_text()
    }
}
