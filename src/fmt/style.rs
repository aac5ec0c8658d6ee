//! SGR text styles, usable both as handler settings and as styling channels
//! on individual records.

use std::fmt;

/// A dedicated type keeps raw escape strings out of handler code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// No styling; renders nothing.
    #[default]
    None,
    Bold,
    Dim,
    Italic,
    Underline,
    Blink,
    CrossOut,
}

impl Style {
    /// The raw SGR escape, or the empty string for `None`.
    #[must_use]
    pub const fn ansi_code(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Bold => "\x1b[1m",
            Self::Dim => "\x1b[2m",
            Self::Italic => "\x1b[3m",
            Self::Underline => "\x1b[4m",
            Self::Blink => "\x1b[5m",
            Self::CrossOut => "\x1b[9m",
        }
    }

    /// Uppercase so styles used as channels sort and render like flag names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Bold => "BOLD",
            Self::Dim => "DIM",
            Self::Italic => "ITALIC",
            Self::Underline => "UNDERLINE",
            Self::Blink => "BLINK",
            Self::CrossOut => "CROSS_OUT",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
