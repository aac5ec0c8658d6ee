//! Deserialized shape of a tracklog TOML configuration.
//!
//! Unknown keys are rejected outright — a typo silently reverting a setting
//! to its default is worse than a parse error.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct ConfigFile {
    pub(super) log: LogSection,
    pub(super) channels: ChannelsSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct LogSection {
    /// Registry name of the destination sink.
    pub(super) output: String,
    /// Destination path, for sinks that write to a file.
    pub(super) file: Option<String>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            output: "stderr".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct ChannelsSection {
    /// Left-margin width for channel tags; 0 disables the margin.
    pub(super) width: usize,
    /// Whether DEBUG records are shown.
    pub(super) debug: bool,
    /// Hash-derived colors for channel tags.
    pub(super) colors: bool,
}

impl Default for ChannelsSection {
    fn default() -> Self {
        Self {
            width: 0,
            debug: true,
            colors: false,
        }
    }
}
