//! Thread arbitration for threaded sessions.
//!
//! One thread at a time owns the output stream; everyone else's work is
//! parked in a per-thread backlog and replayed, contiguously, when
//! ownership passes to them. Ownership transfers only at `finish_thread`
//! boundaries, which is what keeps each thread's block of output intact.

use super::core::Core;
use crate::channel::Channel;
use crate::error::Error;
use crate::record::Payload;
use chrono::{DateTime, Local};
use std::collections::{HashMap, VecDeque};
use std::thread::ThreadId;

/// One unit of deferred logging work. Timestamps are captured at submission
/// time, so replayed records keep their original times.
pub(crate) enum Action {
    Log {
        content: Payload,
        channels: Vec<Channel>,
        timestamp: DateTime<Local>,
    },
    StartTrack {
        title: String,
        channels: Vec<Channel>,
        timestamp: DateTime<Local>,
    },
    EndTrack {
        title: String,
        timestamp: DateTime<Local>,
    },
    /// The producing thread is done; ownership may pass to the next waiter.
    Finish,
}

/// Arbitration state for one threaded session.
#[derive(Default)]
pub(crate) struct Session {
    /// The thread currently allowed to write through the tree.
    pub(super) owner: Option<ThreadId>,
    /// Threads with parked work, in arrival order.
    pub(super) waiting: VecDeque<ThreadId>,
    /// Parked actions per non-owning thread.
    pub(super) backlog: HashMap<ThreadId, VecDeque<Action>>,
}

impl Session {
    pub(super) fn clear(&mut self) {
        self.owner = None;
        self.waiting.clear();
        self.backlog.clear();
    }
}

impl Core {
    /// Runs `action` now if `thread` owns (or can acquire) the stream,
    /// otherwise parks it in the thread's backlog.
    pub(super) fn submit(&mut self, thread: ThreadId, action: Action) -> Result<(), Error> {
        self.arbitrate(thread)?;
        if self.session.owner == Some(thread) {
            self.execute(thread, action)
        } else {
            self.queue_action(thread, action);
            Ok(())
        }
    }

    /// Settles ownership: hands the stream to waiting threads in arrival
    /// order, replaying each one's backlog, until somebody holds it or
    /// `thread` acquires it.
    fn arbitrate(&mut self, thread: ThreadId) -> Result<(), Error> {
        loop {
            let mut progressed = false;
            match self.session.owner {
                None => {
                    if let Some(next) = self.session.waiting.pop_front() {
                        self.session.owner = Some(next);
                        progressed = true;
                    } else {
                        self.session.owner = Some(thread);
                    }
                }
                Some(current) => {
                    // an owner never also waits
                    self.session.waiting.retain(|t| *t != current);
                }
            }

            if let Some(active) = self.session.owner
                && let Some(mut queue) = self.session.backlog.remove(&active)
            {
                // a replayed Finish releases ownership mid-queue; whatever
                // the thread logged after that waits for the next grant
                while self.session.owner == Some(active) {
                    let Some(action) = queue.pop_front() else { break };
                    self.execute(active, action)?;
                }
                if !queue.is_empty() {
                    self.session.backlog.insert(active, queue);
                    if self.session.owner != Some(active) {
                        self.session.waiting.push_back(active);
                        progressed = true;
                    }
                }
            }

            if self.session.owner == Some(thread) || !progressed {
                return Ok(());
            }
        }
    }

    fn queue_action(&mut self, thread: ThreadId, action: Action) {
        self.session
            .backlog
            .entry(thread)
            .or_default()
            .push_back(action);
        if !self.session.waiting.contains(&thread) {
            self.session.waiting.push_back(thread);
        }
    }
}
