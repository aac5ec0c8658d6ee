#![forbid(unsafe_code)]

//! `tracklog` - Hierarchical, track-aware logging engine.
//!
//! A channel-tagged logging library with support for:
//! - Nested "tracks" rendered as indented, bracketed blocks
//! - Free-form channel tags with show/hide filtering per output
//! - Lazily-printed track headers (empty tracks print nothing)
//! - Thread arbitration keeping each thread's output contiguous
//! - A composable handler tree configured in code or from TOML
//!
//! # Example
//!
//! ```
//! use tracklog::Logger;
//!
//! let log = Logger::standard();
//!
//! log.start_track(&[], "loading")?;
//! log.log(&[], "reading model");
//! log.channels(&["vocab".into()]).log("50k entries");
//! log.end_track("loading")?;
//! log.stop();
//! # Ok::<(), tracklog::Error>(())
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod fmt;
pub mod handler;
pub mod logger;
pub mod output;
pub mod record;

pub use channel::{Channel, Flag};
pub use config::{Configuration, Pipeline, SinkRegistry, SinkSettings};
pub use error::Error;
pub use fmt::{Color, Style};
pub use handler::{Combination, FilterHandler, Handler, HandlerTree, VisibilityHandler};
pub use logger::{ChannelHandle, Logger};
pub use output::{ConsoleSink, FileSink, OutputHandler, Sink};
pub use record::{ErrorTrace, Frame, Payload, Record};
