//! The serialized heart of the engine: depth, open-track titles, session
//! state, and the handler tree, all behind the logger's one mutex.

use super::arbiter::{Action, Session};
use crate::channel::{Channel, Flag};
use crate::error::Error;
use crate::handler::{HandlerTree, Message};
use crate::record::{Payload, Record};
use chrono::Local;
use std::thread::ThreadId;

pub(crate) struct Core {
    /// Current track nesting depth.
    pub(super) depth: usize,
    /// Titles of the open tracks, innermost last.
    pub(super) titles: Vec<String>,
    /// True between `start_threads` and `end_threads`.
    pub(super) threaded: bool,
    pub(super) session: Session,
    pub(super) tree: HandlerTree,
}

impl Core {
    pub(super) fn new() -> Self {
        Self {
            depth: 0,
            titles: Vec::new(),
            threaded: false,
            session: Session::default(),
            tree: HandlerTree::new(),
        }
    }

    /// Runs one action against the tree on behalf of `thread`, which may
    /// differ from the calling thread when the arbiter replays a backlog.
    pub(super) fn execute(&mut self, thread: ThreadId, action: Action) -> Result<(), Error> {
        match action {
            Action::Log {
                content,
                channels,
                timestamp,
            } => {
                let record = Record::with_thread(content, channels, self.depth, timestamp, thread);
                self.tree.dispatch(&Message::Simple(record))
            }
            Action::StartTrack {
                title,
                channels,
                timestamp,
            } => {
                let record = Record::with_thread(
                    Payload::Text(title.clone()),
                    channels,
                    self.depth,
                    timestamp,
                    thread,
                );
                self.depth += 1;
                self.titles.push(title);
                self.tree.dispatch(&Message::StartTrack(record))
            }
            Action::EndTrack { title, timestamp } => {
                let expected = self.titles.pop().ok_or(Error::UnbalancedTrack)?;
                // the pop is not undone on mismatch, but no end signal is
                // sent; the state is knowingly confused and the error says so
                if !self.threaded && !expected.eq_ignore_ascii_case(&title) {
                    return Err(Error::TrackMismatch {
                        expected,
                        found: title,
                    });
                }
                self.depth = self.depth.saturating_sub(1);
                self.tree.dispatch(&Message::EndTrack {
                    new_depth: self.depth,
                    timestamp,
                })
            }
            Action::Finish => {
                if self.session.owner == Some(thread) {
                    self.session.owner = None;
                }
                Ok(())
            }
        }
    }

    /// The engine complaining about its own misuse, through the ordinary
    /// pipeline so the message lands wherever the user's logs do.
    pub(super) fn warn_internal(&mut self, message: &str) {
        let record = Record::new(
            Payload::Text(message.to_string()),
            vec![Channel::Flag(Flag::Warn)],
            self.depth,
            Local::now(),
        );
        let _ = self.tree.dispatch(&Message::Simple(record));
    }
}
