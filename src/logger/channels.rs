//! A borrowed handle that pre-binds a channel set, so repeated logging to
//! the same channels doesn't repeat the channel list at every call site.

use super::Logger;
use crate::channel::{Channel, Flag};
use crate::record::Payload;
use std::fmt;

/// Logs through its parent logger with a fixed set of channels attached to
/// every record.
pub struct ChannelHandle<'a> {
    logger: &'a Logger,
    channels: Vec<Channel>,
}

impl<'a> ChannelHandle<'a> {
    pub(super) fn new(logger: &'a Logger, channels: &[Channel]) -> Self {
        Self {
            logger,
            channels: channels.to_vec(),
        }
    }

    /// A handle with additional channels stacked on top of this one's.
    #[must_use]
    pub fn channels(mut self, more: &[Channel]) -> Self {
        self.channels.extend_from_slice(more);
        self
    }

    pub fn log(&self, content: impl Into<Payload>) {
        self.logger.log(&self.channels, content);
    }

    pub fn logf(&self, args: fmt::Arguments<'_>) {
        self.logger.log(&self.channels, args);
    }

    pub fn debug(&self, content: impl Into<Payload>) {
        self.with_flag(Flag::Debug, content);
    }

    pub fn warn(&self, content: impl Into<Payload>) {
        self.with_flag(Flag::Warn, content);
    }

    /// Errors additionally force their way past visibility filtering.
    pub fn err(&self, content: impl Into<Payload>) {
        let mut channels = self.channels.clone();
        channels.push(Channel::Flag(Flag::Error));
        channels.push(Channel::Flag(Flag::Force));
        self.logger.log(&channels, content);
    }

    fn with_flag(&self, flag: Flag, content: impl Into<Payload>) {
        let mut channels = self.channels.clone();
        channels.push(Channel::Flag(flag));
        self.logger.log(&channels, content);
    }
}
