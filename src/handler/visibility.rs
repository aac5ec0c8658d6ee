//! Channel-based show/hide filtering.
//!
//! A visibility stage suppresses noise, never structure: plain records are
//! dropped or admitted by channel, while track and shutdown signals always
//! pass through so downstream track bookkeeping stays balanced.

use super::Handler;
use crate::channel::Channel;
use crate::error::Error;
use crate::record::Record;
use std::collections::HashSet;

/// A default policy (show everything or hide everything) plus a delta set
/// of channels that invert the default for those specific tags.
pub struct VisibilityHandler {
    default_visible: bool,
    delta: HashSet<Channel>,
}

impl Default for VisibilityHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityHandler {
    /// Shows everything until told otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_visible: true,
            delta: HashSet::new(),
        }
    }

    /// Reset to showing every channel.
    pub fn show_all(&mut self) {
        self.default_visible = true;
        self.delta.clear();
    }

    /// Reset to hiding every channel; use `also_show` to re-admit some.
    pub fn hide_all(&mut self) {
        self.default_visible = false;
        self.delta.clear();
    }

    /// Additionally hide `channel`, whatever the default policy is.
    pub fn also_hide(&mut self, channel: Channel) {
        if self.default_visible {
            self.delta.insert(channel);
        } else {
            self.delta.remove(&channel);
        }
    }

    /// Additionally show `channel`, whatever the default policy is.
    pub fn also_show(&mut self, channel: Channel) {
        if self.default_visible {
            self.delta.remove(&channel);
        } else {
            self.delta.insert(channel);
        }
    }

    /// Consuming variant for building filter chains inline.
    #[must_use]
    pub fn hiding(mut self, channel: Channel) -> Self {
        self.also_hide(channel);
        self
    }

    /// Consuming variant for building show-only chains inline.
    #[must_use]
    pub fn showing_only(mut self, channels: impl IntoIterator<Item = Channel>) -> Self {
        self.hide_all();
        for channel in channels {
            self.also_show(channel);
        }
        self
    }

    fn admits(&self, record: &Record) -> bool {
        if record.force() {
            return true;
        }
        if self.default_visible {
            // visible unless every tag is hidden; untagged records show
            record.channels().is_empty()
                || record.channels().iter().any(|c| !self.delta.contains(c))
        } else {
            record.channels().iter().any(|c| self.delta.contains(c))
        }
    }
}

impl Handler for VisibilityHandler {
    fn handle(&mut self, record: &Record) -> Result<Vec<Record>, Error> {
        if self.admits(record) {
            Ok(vec![record.clone()])
        } else {
            Ok(Vec::new())
        }
    }

    fn as_visibility_mut(&mut self) -> Option<&mut VisibilityHandler> {
        Some(self)
    }
}
