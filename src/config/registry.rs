//! Maps sink names from configuration files to constructed output stages.
//!
//! Built-in names cover the common destinations; applications register
//! their own factories to make custom sinks reachable from config files
//! without code changes at the parse site.

use crate::error::Error;
use crate::handler::Handler;
use crate::output::OutputHandler;
use std::collections::HashMap;
use std::path::PathBuf;

/// Settings a factory may consult when building its stage.
#[derive(Debug, Clone, Default)]
pub struct SinkSettings {
    /// Destination path for file-like sinks; `None` falls back to the
    /// platform default log location.
    pub path: Option<PathBuf>,
}

type Factory = fn(&SinkSettings) -> Result<Box<dyn Handler>, Error>;

/// Named sink factories, consulted when a configuration names its output.
pub struct SinkRegistry {
    factories: HashMap<String, Factory>,
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkRegistry {
    /// A registry with the built-in destinations: `stdout`, `stderr`, and
    /// `file`.
    #[must_use]
    pub fn new() -> Self {
        let mut factories: HashMap<String, Factory> = HashMap::new();
        factories.insert("stdout".to_string(), |_| Ok(Box::new(OutputHandler::stdout())));
        factories.insert("stderr".to_string(), |_| Ok(Box::new(OutputHandler::stderr())));
        factories.insert("file".to_string(), |settings| {
            let path = match &settings.path {
                Some(path) => path.clone(),
                None => default_log_path()?,
            };
            Ok(Box::new(OutputHandler::file(path)?))
        });
        Self { factories }
    }

    /// Registers (or replaces) a factory under `name`.
    pub fn register(&mut self, name: &str, factory: Factory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Builds the stage registered under `name`.
    ///
    /// # Errors
    /// `Error::UnknownSink` for unregistered names; factory errors
    /// otherwise.
    pub fn create(&self, name: &str, settings: &SinkSettings) -> Result<Box<dyn Handler>, Error> {
        self.factories
            .get(name)
            .ok_or_else(|| Error::UnknownSink(name.to_string()))?(settings)
    }
}

/// The platform data directory's `tracklog.log`, for `file` sinks without
/// an explicit path.
fn default_log_path() -> Result<PathBuf, Error> {
    directories::ProjectDirs::from("", "", "tracklog")
        .map(|dirs| dirs.data_local_dir().join("tracklog.log"))
        .ok_or_else(|| Error::InvalidPath(PathBuf::from("~/.local/share/tracklog")))
}
