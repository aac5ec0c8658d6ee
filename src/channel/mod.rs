//! Channel tags that classify log records for filtering, routing, and styling.
//!
//! Severity levels are not a separate concept — they are ordinary channels
//! (the [`Flag`] variants), so one mechanism covers severities, free-form
//! categories, and styling directives alike.

use crate::fmt::{Color, Style};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Standard severity and routing flags, reserved ahead of user channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Unrecoverable failures.
    Error,
    /// Non-fatal anomalies.
    Warn,
    /// Development-time diagnostics.
    Debug,
    /// Records that conceptually belong on standard output.
    Stdout,
    /// Records that conceptually belong on standard error.
    Stderr,
    /// Bypasses visibility filtering and lazy track suppression.
    Force,
}

impl Flag {
    /// Uppercase because the margin renders flags as `[ERROR ...]` blocks.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Debug => "DEBUG",
            Self::Stdout => "STDOUT",
            Self::Stderr => "STDERR",
            Self::Force => "FORCE",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` so config files can name flags symbolically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFlagError(String);

impl fmt::Display for ParseFlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown flag: '{}'", self.0)
    }
}

impl std::error::Error for ParseFlagError {}

impl FromStr for Flag {
    type Err = ParseFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "debug" | "dbg" => Ok(Self::Debug),
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            "force" => Ok(Self::Force),
            _ => Err(ParseFlagError(s.to_string())),
        }
    }
}

/// One tag attached to a log record.
///
/// A record carries an unordered bag of these; the canonical display order
/// (computed by [`Channel::order`]) puts the reserved `FORCE` flag first,
/// then the other flags, then everything else alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// A reserved severity/routing flag.
    Flag(Flag),
    /// A free-form category name.
    Name(String),
    /// A styling directive: render this record's content in a color.
    Color(Color),
    /// A styling directive: render this record's content in a style.
    Style(Style),
}

impl Channel {
    /// Free-form channels come up constantly in call sites; this reads
    /// better than `Channel::Name("tag".to_string())`.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// True iff this is the reserved `FORCE` marker.
    #[must_use]
    pub const fn is_force(&self) -> bool {
        matches!(self, Self::Flag(Flag::Force))
    }

    /// Flags sort ahead of user channels in the canonical order.
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        matches!(self, Self::Flag(_))
    }

    /// Styling directives set the record's rendering but never appear in
    /// the channel margin.
    #[must_use]
    pub const fn is_styling(&self) -> bool {
        matches!(self, Self::Color(_) | Self::Style(_))
    }

    /// Canonical tie-break: `FORCE` first, then flags, then everything else
    /// alphabetically by display form.
    #[must_use]
    pub fn order(a: &Self, b: &Self) -> Ordering {
        if a.is_force() && b.is_force() {
            Ordering::Equal
        } else if a.is_force() {
            Ordering::Less
        } else if b.is_force() {
            Ordering::Greater
        } else if a.is_flag() && !b.is_flag() {
            Ordering::Less
        } else if b.is_flag() && !a.is_flag() {
            Ordering::Greater
        } else {
            a.to_string().cmp(&b.to_string())
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => flag.fmt(f),
            Self::Name(name) => f.write_str(name),
            Self::Color(color) => color.fmt(f),
            Self::Style(style) => style.fmt(f),
        }
    }
}

impl From<Flag> for Channel {
    fn from(flag: Flag) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Channel {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Color> for Channel {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

impl From<Style> for Channel {
    fn from(style: Style) -> Self {
        Self::Style(style)
    }
}
