//! Unified error type for all tracklog operations.

use std::path::PathBuf;

/// Error type for tracklog operations.
///
/// Usage errors (mismatched tracks, tree mutation inside a track, nested
/// sessions) indicate an instrumentation bug and are returned to the caller
/// of the logging API. Sink write failures never surface here — logging is
/// best-effort and must not crash the host computation.
#[derive(Debug)]
pub enum Error {
    /// `end_track` title did not match the innermost open track.
    TrackMismatch {
        /// Title of the track that is actually open.
        expected: String,
        /// Title the caller tried to close.
        found: String,
    },
    /// More `end_track` calls than `start_track` calls.
    UnbalancedTrack,
    /// An output stage received an end-of-track signal with no open track
    /// on its private stack.
    UnmatchedTrackEnd,
    /// Handler tree mutation attempted while a track is open.
    MutationWithinTrack,
    /// `start_threads` called while a threaded session is already active.
    NestedSession,
    /// I/O error opening a sink destination.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Config key `log.output` named a sink the registry does not know.
    UnknownSink(String),
    /// A sink path could not be resolved.
    InvalidPath(PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrackMismatch { expected, found } => {
                write!(
                    f,
                    "track names do not match: expected: {expected} found: {found}"
                )
            }
            Self::UnbalancedTrack => write!(f, "end_track called with no track open"),
            Self::UnmatchedTrackEnd => write!(
                f,
                "output stage received end_track without matching start_track; \
                 are the handlers mis-configured?"
            ),
            Self::MutationWithinTrack => {
                write!(f, "cannot modify the handler tree while within a track")
            }
            Self::NestedSession => write!(f, "cannot nest threaded logging sessions"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::UnknownSink(name) => write!(f, "unknown output sink: {name}"),
            Self::InvalidPath(p) => write!(f, "invalid path: {}", p.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
