//! Declarative pipeline construction: build handler topologies as values,
//! then apply them to a logger in one transactional step.

mod registry;
mod structs;

pub use registry::{SinkRegistry, SinkSettings};

use self::structs::ConfigFile;
use crate::channel::{Channel, Flag};
use crate::error::Error;
use crate::handler::{Handler, VisibilityHandler};
use crate::logger::Logger;
use crate::output::OutputHandler;
use std::path::PathBuf;

/// A handler topology described as a value, mounted onto the tree by
/// [`Logger::install`].
pub enum Pipeline {
    /// A terminal stage.
    Sink(Box<dyn Handler>),
    /// Stages applied in order, feeding into the rest of the pipeline.
    Chain(Vec<Box<dyn Handler>>, Box<Pipeline>),
    /// Independent sub-pipelines fed the same records.
    Branch(Vec<Pipeline>),
}

impl Pipeline {
    /// A terminal stage.
    #[must_use]
    pub fn sink(handler: impl Handler + 'static) -> Self {
        Self::Sink(Box::new(handler))
    }

    /// `stages` in order, then `rest`.
    #[must_use]
    pub fn chain(stages: Vec<Box<dyn Handler>>, rest: Self) -> Self {
        Self::Chain(stages, Box::new(rest))
    }

    /// Fan the same records out to every branch.
    #[must_use]
    pub fn branch(pipelines: Vec<Self>) -> Self {
        Self::Branch(pipelines)
    }
}

/// A complete engine setup: pipelines plus the tree-wide output knobs.
/// Applying a configuration replaces whatever was installed before.
pub struct Configuration {
    channel_width: usize,
    random_colors: bool,
    pipelines: Vec<Pipeline>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::standard()
    }
}

impl Configuration {
    /// No handlers at all; records go nowhere.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            channel_width: 0,
            random_colors: false,
            pipelines: Vec::new(),
        }
    }

    /// The standard setup: channel visibility filtering in front of a
    /// console stage on standard error.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty().with_pipeline(Pipeline::chain(
            vec![Box::new(VisibilityHandler::new())],
            Pipeline::sink(OutputHandler::stderr()),
        ))
    }

    /// Adds one more pipeline branch under the root.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipelines.push(pipeline);
        self
    }

    /// Left-margin width for channel tags on every output stage.
    #[must_use]
    pub const fn with_channel_width(mut self, width: usize) -> Self {
        self.channel_width = width;
        self
    }

    /// Hash-derived channel colors on every output stage.
    #[must_use]
    pub const fn with_random_colors(mut self, on: bool) -> Self {
        self.random_colors = on;
        self
    }

    /// Parses a TOML configuration using the built-in sink registry.
    ///
    /// # Errors
    /// `Error::ConfigParse` for malformed or unknown keys;
    /// `Error::UnknownSink` or sink construction errors otherwise.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Self::from_toml_with(text, &SinkRegistry::new())
    }

    /// Parses a TOML configuration, resolving the output sink through
    /// `registry` so application-defined sinks are reachable from config
    /// files.
    ///
    /// # Errors
    /// Same as [`from_toml`](Self::from_toml).
    pub fn from_toml_with(text: &str, registry: &SinkRegistry) -> Result<Self, Error> {
        let file: ConfigFile = toml::from_str(text)?;
        let settings = SinkSettings {
            path: file.log.file.map(PathBuf::from),
        };
        let sink = registry.create(&file.log.output, &settings)?;
        let mut visibility = VisibilityHandler::new();
        if !file.channels.debug {
            visibility = visibility.hiding(Channel::Flag(Flag::Debug));
        }
        Ok(Self {
            channel_width: file.channels.width,
            random_colors: file.channels.colors,
            pipelines: vec![Pipeline::Chain(
                vec![Box::new(visibility)],
                Box::new(Pipeline::Sink(sink)),
            )],
        })
    }

    /// Replaces `logger`'s handlers with this configuration's pipelines and
    /// applies the tree-wide output settings.
    ///
    /// # Errors
    /// `Error::MutationWithinTrack` while any track is open.
    pub fn apply(self, logger: &Logger) -> Result<(), Error> {
        logger.clear_handlers()?;
        for pipeline in self.pipelines {
            logger.install(pipeline)?;
        }
        logger.set_channel_width(self.channel_width);
        logger.set_random_colors(self.random_colors);
        Ok(())
    }
}
