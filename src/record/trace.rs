//! Renderable error payloads: a summary, optional frames, and a causal
//! chain, so a logged failure reads like a conventional stack trace.

use std::error::Error as StdError;
use std::fmt;

/// One frame of an [`ErrorTrace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The function or method the frame executes in. Causal-chain
    /// deduplication compares this field.
    pub symbol: String,
    /// Source location, free-form (`file.rs:123`).
    pub location: String,
}

impl Frame {
    #[must_use]
    pub fn new(symbol: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            f.write_str(&self.symbol)
        } else {
            write!(f, "{} ({})", self.symbol, self.location)
        }
    }
}

/// A captured error with its causal chain.
///
/// Built either straight from a `std::error::Error` (walking `source()`,
/// no frames) or assembled manually when frame information is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTrace {
    /// The error's own display line.
    pub summary: String,
    /// Frames from the failure point outward; may be empty.
    pub frames: Vec<Frame>,
    /// The wrapped error, if any.
    pub cause: Option<Box<ErrorTrace>>,
}

impl ErrorTrace {
    /// A trace with no frames and no cause.
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            frames: Vec::new(),
            cause: None,
        }
    }

    /// Walks the `source()` chain into `Caused by:` entries.
    #[must_use]
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut root = Self::new(err.to_string());
        let mut tail = &mut root.cause;
        let mut source = err.source();
        while let Some(cause) = source {
            source = cause.source();
            tail = &mut tail.insert(Box::new(Self::new(cause.to_string()))).cause;
        }
        root
    }

    #[must_use]
    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }

    #[must_use]
    pub fn caused_by(mut self, cause: Self) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Renders the trace as display lines: the summary, each frame indented
    /// by `tab`, then every cause as a `Caused by:` block.
    ///
    /// Once a cause's frame matches the symbol of the previous exception's
    /// top frame the remaining frames are redundant; they collapse into a
    /// single `...N more` line.
    #[must_use]
    pub fn render_lines(&self, tab: &str) -> Vec<String> {
        let mut lines = vec![self.summary.clone()];
        for frame in &self.frames {
            lines.push(format!("{tab}{frame}"));
        }

        let mut top_symbol = self.frames.first().map(|f| f.symbol.clone());
        let mut current = self.cause.as_deref();
        while let Some(cause) = current {
            lines.push(format!("Caused by: {}", cause.summary));
            for (i, frame) in cause.frames.iter().enumerate() {
                lines.push(format!("{tab}{frame}"));
                if top_symbol.as_deref() == Some(frame.symbol.as_str()) {
                    lines.push(format!("{tab}...{} more", cause.frames.len() - i - 1));
                    break;
                }
            }
            top_symbol = cause.frames.first().map(|f| f.symbol.clone());
            current = cause.cause.as_deref();
        }
        lines
    }
}

impl fmt::Display for ErrorTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}
