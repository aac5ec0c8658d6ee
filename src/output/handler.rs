//! The abstract output stage: turns records and track signals into
//! formatted text for a concrete sink.
//!
//! All track bookkeeping here is per-stage — each output handler keeps its
//! own stack of open tracks and its own queue of headers not yet printed,
//! so two sinks with different upstream filters can disagree about which
//! tracks are visibly open.

use super::Sink;
use crate::channel::Channel;
use crate::error::Error;
use crate::fmt::{self, Color, Style, format_time_difference};
use crate::handler::Handler;
use crate::record::{Payload, Record};
use chrono::{DateTime, Local};
use std::collections::{HashMap, VecDeque};

/// What the closing of a track needs to know about its opening.
struct TrackInfo {
    name: String,
    begin: DateTime<Local>,
    /// Lines flushed while this track (or a still-open descendant) was the
    /// innermost open track; decides the closing name reminder.
    lines: usize,
}

impl TrackInfo {
    fn new(name: String, begin: DateTime<Local>) -> Self {
        Self {
            name,
            begin,
            lines: 0,
        }
    }
}

/// Formats records (channel margins, indentation, exception unwinding,
/// colorization) and manages lazy track-bracket printing for one sink.
pub struct OutputHandler {
    sink: Box<dyn Sink>,
    /// One indentation unit per nesting depth.
    tab: String,
    channel_separator: char,
    /// Width reserved for channel tags; below 3 the margin is not printed.
    left_margin: usize,
    /// Closing a track longer than this many lines repeats the track name.
    min_lines_for_reminder: usize,
    /// Tracks started but not yet printed because nothing inside them has
    /// needed to be written.
    queued_tracks: VecDeque<Record>,
    track_stack: Vec<TrackInfo>,
    /// The innermost open track, kept out of the stack to avoid peeking.
    current: Option<TrackInfo>,
    /// True while a flushed header still awaits its opening `{`.
    missing_open_bracket: bool,
    track_color: Color,
    track_style: Style,
    channel_colors: HashMap<String, Color>,
    channel_styles: HashMap<String, Style>,
    random_colors: bool,
}

impl OutputHandler {
    /// Wraps a sink with default formatting: two-space tabs, no channel
    /// margin, name reminders above 50 lines.
    #[must_use]
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            tab: "  ".to_string(),
            channel_separator: ' ',
            left_margin: 0,
            min_lines_for_reminder: 50,
            queued_tracks: VecDeque::new(),
            track_stack: Vec::new(),
            current: None,
            missing_open_bracket: false,
            track_color: Color::None,
            track_style: Style::None,
            channel_colors: HashMap::new(),
            channel_styles: HashMap::new(),
            random_colors: false,
        }
    }

    /// A stage printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(super::ConsoleSink::stdout())
    }

    /// A stage printing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(super::ConsoleSink::stderr())
    }

    /// A stage appending to a file.
    ///
    /// # Errors
    /// `Error::Io` if the destination cannot be opened.
    pub fn file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        Ok(Self::new(super::FileSink::create(path)?))
    }

    /// Reserve `width` columns for channel tags; widths below 3 disable
    /// the margin entirely.
    #[must_use]
    pub const fn with_left_margin(mut self, width: usize) -> Self {
        self.left_margin = width;
        self
    }

    /// Closing brackets repeat the track name above this line count.
    #[must_use]
    pub const fn with_reminder_threshold(mut self, lines: usize) -> Self {
        self.min_lines_for_reminder = lines;
        self
    }

    /// Color for track brackets and titles.
    #[must_use]
    pub const fn with_track_color(mut self, color: Color) -> Self {
        self.track_color = color;
        self
    }

    /// Style for track brackets and titles.
    #[must_use]
    pub const fn with_track_style(mut self, style: Style) -> Self {
        self.track_style = style;
        self
    }

    /// Deterministic hash-derived colors for channels without an explicit
    /// mapping.
    #[must_use]
    pub const fn with_random_colors(mut self, on: bool) -> Self {
        self.random_colors = on;
        self
    }

    /// Pin a channel's margin tag to a color; explicit mappings beat the
    /// random assignment.
    pub fn color_channel(&mut self, channel: &str, color: Color) {
        self.channel_colors.insert(channel.to_lowercase(), color);
    }

    /// Pin a channel's margin tag to a style.
    pub fn style_channel(&mut self, channel: &str, style: Style) {
        self.channel_styles.insert(channel.to_lowercase(), style);
    }

    /// Post-install margin adjustment (`Logger::set_channel_width` walks
    /// the tree calling this).
    pub const fn set_left_margin(&mut self, width: usize) {
        self.left_margin = width;
    }

    /// Post-install random-color toggle.
    pub const fn set_random_colors(&mut self, on: bool) {
        self.random_colors = on;
    }

    /// Post-install reminder-threshold adjustment.
    pub const fn set_reminder_threshold(&mut self, lines: usize) {
        self.min_lines_for_reminder = lines;
    }

    fn ansi_active(&self) -> bool {
        fmt::ansi_supported() && self.sink.supports_ansi()
    }

    /// Wraps `line` in escape codes when both the process and the sink
    /// support ANSI; otherwise the text passes through unstyled.
    fn styled(&self, line: &str, color: Color, style: Style) -> String {
        if (color == Color::None && style == Style::None) || !self.ansi_active() {
            return line.to_string();
        }
        let mut b = String::with_capacity(line.len() + 16);
        b.push_str(color.ansi_code());
        b.push_str(style.ansi_code());
        b.push_str(line);
        b.push_str(Color::RESET);
        b
    }

    /// The color for one channel tag: explicit mapping first, then the
    /// cached random assignment with the ERROR/WARN overrides.
    fn channel_color(&mut self, key: &str) -> Color {
        if let Some(&color) = self.channel_colors.get(key) {
            return color;
        }
        if !self.random_colors {
            return Color::None;
        }
        let color = if key.eq_ignore_ascii_case("error") {
            Color::Red
        } else if key.eq_ignore_ascii_case("warn") {
            Color::Yellow
        } else {
            Color::from_channel_name(key)
        };
        // cached so the channel keeps this color for the process lifetime
        self.channel_colors.insert(key.to_string(), color);
        color
    }

    fn format_channel(&mut self, b: &mut String, channel_str: &str, channel: &Channel) -> bool {
        if self.channel_colors.is_empty() && self.channel_styles.is_empty() && !self.random_colors {
            b.push_str(channel_str);
        } else {
            let key = channel.to_string().to_lowercase();
            let color = self.channel_color(&key);
            let style = self.channel_styles.get(&key).copied().unwrap_or(Style::None);
            b.push_str(&self.styled(channel_str, color, style));
        }
        true
    }

    /// Indentation for one line: the margin tab when a margin is
    /// configured, then one tab per depth level, then the content.
    fn write_content(&self, depth: usize, content: &str, b: &mut String) {
        if self.left_margin > 2 {
            b.push_str(&self.tab);
        }
        for _ in 0..depth {
            b.push_str(&self.tab);
        }
        b.push_str(content);
    }

    /// Flushes queued track headers shallower than `until_depth`, in order.
    /// Headers stay queued until something inside the track actually needs
    /// to print, which is what suppresses empty `{ }` pairs.
    fn update_tracks(&mut self, until_depth: usize) {
        while let Some(signal) = self.queued_tracks.pop_front() {
            if signal.depth >= until_depth {
                self.queued_tracks.push_back(signal);
                return;
            }
            let mut b = String::new();
            if self.missing_open_bracket {
                b.push_str("{\n");
            }
            for _ in 0..self.left_margin {
                b.push(' ');
            }
            let title = signal.content_text();
            self.write_content(signal.depth, &title, &mut b);
            if !title.is_empty() {
                b.push(' ');
            }
            let line = self.styled(&b, self.track_color, self.track_style);
            let _ = self.sink.print(None, &line);
            // only the next write decides whether the bracket opens
            self.missing_open_bracket = true;
            if let Some(info) = &mut self.current {
                info.lines += 1;
            }
        }
    }

    fn content_lines(&self, payload: &Payload) -> Vec<String> {
        match payload {
            Payload::Trace(trace) => trace.render_lines(&self.tab),
            Payload::Text(text) => text.split('\n').map(str::to_string).collect(),
            Payload::Lazy(supplier) => supplier().split('\n').map(str::to_string).collect(),
        }
    }
}

impl Handler for OutputHandler {
    fn handle(&mut self, record: &Record) -> Result<Vec<Record>, Error> {
        let content = self.content_lines(&record.content);

        self.update_tracks(record.depth);
        let mut b = String::with_capacity(256);
        if self.missing_open_bracket {
            let open = self.styled("{\n", self.track_color, self.track_style);
            b.push_str(&open);
            self.missing_open_bracket = false;
        }

        // styling channels configure the record's rendering; the force tag
        // and styling channels never appear in the margin
        let mut color = Color::None;
        let mut style = Style::None;
        let mut printable: Vec<Channel> = Vec::new();
        for channel in record.channels() {
            match channel {
                Channel::Color(c) => color = *c,
                Channel::Style(s) => style = *s,
                c if c.is_force() => {}
                c => printable.push(c.clone()),
            }
        }

        let mut cursor = 0usize;
        let mut lines_written = 0usize;

        if self.left_margin > 2 {
            b.push('[');
            cursor += 1;
            let mut last: Option<String> = None;
            let mut any_printed = false;
            for (i, channel) in printable.iter().enumerate() {
                let full = channel.to_string();
                // consecutive duplicate tags collapse
                if last.as_deref() == Some(full.as_str()) {
                    continue;
                }
                last = Some(full.clone());
                let mut tag = full;
                if tag.chars().count() > self.left_margin - 1 {
                    tag = tag.chars().take(self.left_margin - 2).collect();
                }
                let tag_len = tag.chars().count();
                if cursor + tag_len >= self.left_margin {
                    // tag doesn't fit: finish this line with a content line
                    // and continue the margin one row down
                    while cursor < self.left_margin {
                        b.push(' ');
                        cursor += 1;
                    }
                    if lines_written < content.len() {
                        let line = self.styled(&content[lines_written], color, style);
                        self.write_content(record.depth, &line, &mut b);
                        lines_written += 1;
                    }
                    b.push_str("\n ");
                    cursor = 1;
                }
                let printed = self.format_channel(&mut b, &tag, channel);
                any_printed = any_printed || printed;
                if printed && i < printable.len() - 1 {
                    b.push(self.channel_separator);
                    cursor += 1;
                }
                cursor += tag_len;
            }
            if any_printed {
                b.push(']');
                cursor += 1;
            } else {
                // retract the `[` rather than render an empty pair
                b.pop();
                cursor = cursor.saturating_sub(1);
            }
        }

        while lines_written < content.len() {
            while cursor < self.left_margin {
                b.push(' ');
                cursor += 1;
            }
            let line = self.styled(&content[lines_written], color, style);
            self.write_content(record.depth, &line, &mut b);
            lines_written += 1;
            if lines_written < content.len() {
                b.push('\n');
                cursor = 0;
            }
        }

        if !b.ends_with('\n') {
            b.push('\n');
        }
        let _ = self.sink.print(Some(record.channels()), &b);

        if let Some(info) = &mut self.current {
            info.lines += 1;
        }
        Ok(vec![record.clone()])
    }

    fn start_track(&mut self, signal: &Record) -> Result<Vec<Record>, Error> {
        self.queued_tracks.push_back(signal.clone());
        if let Some(info) = self.current.take() {
            self.track_stack.push(info);
        }
        self.current = Some(TrackInfo::new(signal.content_text(), signal.timestamp));
        if signal.force() {
            self.update_tracks(signal.depth + 1);
        }
        Ok(Vec::new())
    }

    fn end_track(
        &mut self,
        new_depth: usize,
        timestamp: DateTime<Local>,
    ) -> Result<Vec<Record>, Error> {
        let child = self.current.take().ok_or(Error::UnmatchedTrackEnd)?;
        self.current = self.track_stack.pop();
        if let Some(parent) = &mut self.current {
            parent.lines += child.lines;
        }

        if self.queued_tracks.is_empty() {
            let mut b = String::new();
            if !self.missing_open_bracket {
                for _ in 0..self.left_margin {
                    b.push(' ');
                }
                self.write_content(new_depth, "", &mut b);
                b.push_str("} ");
            }
            self.missing_open_bracket = false;
            if child.lines > self.min_lines_for_reminder {
                b.push_str("<< ");
                b.push_str(&child.name);
                b.push(' ');
            }
            let elapsed = timestamp.signed_duration_since(child.begin).num_milliseconds();
            if elapsed > 100 {
                b.push('[');
                format_time_difference(elapsed, &mut b);
                b.push(']');
            }
            b.push('\n');
            let line = self.styled(&b, self.track_color, self.track_style);
            let _ = self.sink.print(None, &line);
        } else {
            // the track never printed anything: drop its queued header so
            // no empty bracket pair appears
            self.queued_tracks.pop_back();
        }
        Ok(Vec::new())
    }

    fn shutdown(&mut self) -> Result<Vec<Record>, Error> {
        let _ = self.sink.flush();
        Ok(Vec::new())
    }

    fn as_output_mut(&mut self) -> Option<&mut OutputHandler> {
        Some(self)
    }
}
