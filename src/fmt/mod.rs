//! ANSI colors, text styles, and duration formatting shared by the output
//! stages.

mod color;
mod duration;
mod style;

pub use color::Color;
pub use duration::{format_time_difference, time_difference};
pub use style::Style;

use std::sync::OnceLock;

/// Whether this process should ever emit ANSI escapes.
///
/// Individual sinks additionally opt in via `Sink::supports_ansi`; both
/// must be true before any styling is written. `NO_COLOR` wins over
/// everything, `TRACKLOG_ANSI=1` forces escapes on, and otherwise escapes
/// are enabled on Unix-like platforms only.
pub fn ansi_supported() -> bool {
    static SUPPORTED: OnceLock<bool> = OnceLock::new();
    *SUPPORTED.get_or_init(|| {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if std::env::var_os("TRACKLOG_ANSI").is_some_and(|v| v == "1") {
            return true;
        }
        cfg!(unix)
    })
}
