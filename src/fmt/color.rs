//! The 16-color ANSI palette — log margins only need enough hues to tell
//! channels apart, not true-color fidelity.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

/// A dedicated type keeps raw escape strings out of handler code and lets
/// colors double as styling channels on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// No coloring; renders nothing.
    #[default]
    None,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// Terminates any active SGR styling.
    pub const RESET: &'static str = "\x1b[0m";

    /// Colors assignable by the deterministic per-channel hash. `None`,
    /// `Black`, and `White` are reserved as neutral and never assigned
    /// randomly.
    pub const RANDOM_PALETTE: [Self; 6] = [
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
    ];

    /// The raw foreground escape, or the empty string for `None`.
    #[must_use]
    pub const fn ansi_code(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Black => "\x1b[30m",
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Blue => "\x1b[34m",
            Self::Magenta => "\x1b[35m",
            Self::Cyan => "\x1b[36m",
            Self::White => "\x1b[37m",
        }
    }

    /// Deterministic color for a channel name. The same name always maps to
    /// the same palette entry within a process, so a channel keeps its color
    /// across the whole log.
    #[must_use]
    pub fn from_channel_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        let idx = usize::try_from(hasher.finish() % Self::RANDOM_PALETTE.len() as u64)
            .unwrap_or_default();
        Self::RANDOM_PALETTE[idx]
    }

    /// Uppercase so colors used as channels sort and render like flag names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Black => "BLACK",
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Blue => "BLUE",
            Self::Magenta => "MAGENTA",
            Self::Cyan => "CYAN",
            Self::White => "WHITE",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
