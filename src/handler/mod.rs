//! Pluggable stages that records and track signals flow through.
//!
//! The built-in stages (visibility, predicate filter, output) can't cover
//! every use case — the `Handler` trait lets users add custom stages
//! without modifying tracklog itself.

mod filter;
mod tree;
mod visibility;

pub use filter::{Combination, FilterHandler};
pub use tree::HandlerTree;
pub use visibility::VisibilityHandler;

use crate::error::Error;
use crate::output::OutputHandler;
use crate::record::Record;
use chrono::{DateTime, Local};

/// One stage in the handler tree.
///
/// Each operation returns the derived records to keep propagating to child
/// stages: an empty list drops the input, a single clone forwards it, and
/// multiple records fan it out. Track and shutdown signals additionally
/// recurse into children on their own, after the derived records, so a
/// flushed pre-record is fully rendered before the structural signal that
/// caused it.
pub trait Handler: Send {
    /// Transform or filter a plain log record.
    ///
    /// # Errors
    /// Usage errors detected while processing (mis-configured handlers).
    fn handle(&mut self, record: &Record) -> Result<Vec<Record>, Error>;

    /// React to the start of a track. The signal record carries the track
    /// title and the pre-increment depth.
    ///
    /// # Errors
    /// Usage errors detected while processing.
    fn start_track(&mut self, signal: &Record) -> Result<Vec<Record>, Error> {
        let _ = signal;
        Ok(Vec::new())
    }

    /// React to the end of a track at the new (post-decrement) depth.
    ///
    /// # Errors
    /// `Error::UnmatchedTrackEnd` if this stage has no open track.
    fn end_track(
        &mut self,
        new_depth: usize,
        timestamp: DateTime<Local>,
    ) -> Result<Vec<Record>, Error> {
        let _ = (new_depth, timestamp);
        Ok(Vec::new())
    }

    /// React to engine shutdown (flush buffers, close resources).
    ///
    /// # Errors
    /// Usage errors detected while processing.
    fn shutdown(&mut self) -> Result<Vec<Record>, Error> {
        Ok(Vec::new())
    }

    /// Downcast hook for tree-wide operations on visibility stages
    /// (`hide_channels_everywhere`).
    fn as_visibility_mut(&mut self) -> Option<&mut VisibilityHandler> {
        None
    }

    /// Downcast hook for tree-wide operations on output stages
    /// (channel margin width, random colors).
    fn as_output_mut(&mut self) -> Option<&mut OutputHandler> {
        None
    }
}

/// The kinds of message a stage can receive, closed by construction so
/// dispatch is exhaustive.
#[derive(Debug, Clone)]
pub(crate) enum Message {
    Simple(Record),
    StartTrack(Record),
    EndTrack {
        new_depth: usize,
        timestamp: DateTime<Local>,
    },
    Shutdown,
}
