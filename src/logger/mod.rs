//! The public face of the engine.
//!
//! A `Logger` is an explicit value, not process-global state: create one,
//! share it by reference (it is `Sync`), and every operation goes through
//! its single internal mutex, which is what serializes the whole pipeline.

mod arbiter;
mod channels;
mod core;

pub use channels::ChannelHandle;

use self::arbiter::Action;
use self::core::Core;
use crate::channel::{Channel, Flag};
use crate::config::{Configuration, Pipeline};
use crate::error::Error;
use crate::handler::{Handler, HandlerTree, Message};
use crate::record::Payload;
use chrono::Local;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A hierarchical, channel-tagged logging engine.
pub struct Logger {
    core: Mutex<Core>,
    /// Once set, every logging operation becomes a silent no-op.
    closed: AtomicBool,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// An engine with no handlers installed: records go nowhere until a
    /// configuration is applied or handlers are added.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: Mutex::new(Core::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// An engine with the standard setup: visibility filtering in front of
    /// a console stage on standard error.
    #[must_use]
    pub fn standard() -> Self {
        let logger = Self::new();
        // the standard pipeline cannot fail to install on a fresh engine
        let _ = Configuration::standard().apply(&logger);
        logger
    }

    /// A poisoned mutex only means another thread panicked mid-log; the
    /// engine state is still coherent enough to keep logging.
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Logs `content` to `channels`. Infallible by design: pipeline
    /// problems are swallowed, logging never crashes the host computation.
    pub fn log(&self, channels: &[Channel], content: impl Into<Payload>) {
        if self.closed.load(Ordering::Relaxed) {
            return;
        }
        let thread = std::thread::current().id();
        let action = Action::Log {
            content: content.into(),
            channels: channels.to_vec(),
            timestamp: Local::now(),
        };
        let mut core = self.lock();
        let _ = if core.threaded {
            core.submit(thread, action)
        } else {
            core.execute(thread, action)
        };
    }

    /// `format_args!` variant of [`log`](Self::log).
    pub fn logf(&self, channels: &[Channel], args: fmt::Arguments<'_>) {
        self.log(channels, args);
    }

    pub fn debug(&self, content: impl Into<Payload>) {
        self.log(&[Channel::Flag(Flag::Debug)], content);
    }

    pub fn warn(&self, content: impl Into<Payload>) {
        self.log(&[Channel::Flag(Flag::Warn)], content);
    }

    /// Errors force their way past visibility filtering.
    pub fn err(&self, content: impl Into<Payload>) {
        self.log(
            &[Channel::Flag(Flag::Error), Channel::Flag(Flag::Force)],
            content,
        );
    }

    /// A handle that attaches `channels` to everything logged through it.
    #[must_use]
    pub fn channels(&self, channels: &[Channel]) -> ChannelHandle<'_> {
        ChannelHandle::new(self, channels)
    }

    /// Opens a nested track titled `title`. Subsequent records are one
    /// level deeper until the matching [`end_track`](Self::end_track).
    ///
    /// # Errors
    /// Pipeline errors raised by handler stages.
    pub fn start_track(&self, channels: &[Channel], title: &str) -> Result<(), Error> {
        if self.closed.load(Ordering::Relaxed) {
            return Ok(());
        }
        let thread = std::thread::current().id();
        let action = Action::StartTrack {
            title: title.to_string(),
            channels: channels.to_vec(),
            timestamp: Local::now(),
        };
        let mut core = self.lock();
        if core.threaded {
            core.submit(thread, action)
        } else {
            core.execute(thread, action)
        }
    }

    /// A track whose header prints immediately, even if the track stays
    /// empty.
    ///
    /// # Errors
    /// Pipeline errors raised by handler stages.
    pub fn force_track(&self, title: &str) -> Result<(), Error> {
        self.start_track(&[Channel::Flag(Flag::Force)], title)
    }

    /// Closes the innermost track.
    ///
    /// # Errors
    /// `Error::UnbalancedTrack` with no track open;
    /// `Error::TrackMismatch` when `title` disagrees with the track being
    /// closed (case-insensitive, and not checked inside threaded sessions).
    pub fn end_track(&self, title: &str) -> Result<(), Error> {
        if self.closed.load(Ordering::Relaxed) {
            return Ok(());
        }
        let thread = std::thread::current().id();
        let action = Action::EndTrack {
            title: title.to_string(),
            timestamp: Local::now(),
        };
        let mut core = self.lock();
        if core.threaded {
            core.submit(thread, action)
        } else {
            core.execute(thread, action)
        }
    }

    /// Enters a threaded session: until [`end_threads`](Self::end_threads),
    /// records from concurrent threads are arbitrated so each thread's
    /// output forms one contiguous block. The session itself is a forced
    /// track titled `Threads( title )`.
    ///
    /// # Errors
    /// `Error::NestedSession` if a session is already open.
    pub fn start_threads(&self, title: &str) -> Result<(), Error> {
        let thread = std::thread::current().id();
        let mut core = self.lock();
        if core.threaded {
            return Err(Error::NestedSession);
        }
        core.execute(
            thread,
            Action::StartTrack {
                title: format!("Threads( {title} )"),
                channels: vec![Channel::Flag(Flag::Force)],
                timestamp: Local::now(),
            },
        )?;
        core.threaded = true;
        Ok(())
    }

    /// Declares the calling thread done with the current threaded session,
    /// letting ownership of the output stream pass to the next waiter.
    /// Calling this outside a session is an anomaly, not an error: it warns
    /// through the pipeline and returns.
    pub fn finish_thread(&self) {
        let thread = std::thread::current().id();
        let mut core = self.lock();
        if core.threaded {
            let _ = core.submit(thread, Action::Finish);
        } else {
            core.warn_internal("finish_thread() called outside of a threaded session");
        }
    }

    /// Closes the threaded session, replaying any backlog left by threads
    /// that never called [`finish_thread`](Self::finish_thread), then ends
    /// the session track.
    ///
    /// # Errors
    /// `Error::TrackMismatch` when `check` disagrees with the title the
    /// session was started with; pipeline errors from replayed records.
    pub fn end_threads(&self, check: &str) -> Result<(), Error> {
        let thread = std::thread::current().id();
        let mut core = self.lock();
        if !core.threaded {
            core.warn_internal("end_threads() called outside of a threaded session");
            return Ok(());
        }
        if let Some(owner) = core.session.owner {
            core.warn_internal(&format!(
                "ending threaded session while thread {owner:?} still holds the stream"
            ));
        }
        core.threaded = false;
        // replay abandoned backlogs, one thread's block at a time
        loop {
            let stale: Vec<_> = core.session.backlog.keys().copied().collect();
            if stale.is_empty() {
                break;
            }
            for thread in stale {
                if let Some(mut queue) = core.session.backlog.remove(&thread) {
                    if !queue.is_empty() {
                        core.warn_internal(&format!(
                            "thread {thread:?} never called finish_thread(); replaying its records now"
                        ));
                    }
                    while let Some(action) = queue.pop_front() {
                        core.execute(thread, action)?;
                    }
                }
            }
        }
        core.session.clear();
        core.execute(
            thread,
            Action::EndTrack {
                title: format!("Threads( {check} )"),
                timestamp: Local::now(),
            },
        )
    }

    /// Adds a handler as a direct child of the tree root.
    ///
    /// # Errors
    /// `Error::MutationWithinTrack` while any track is open.
    pub fn add_handler(&self, handler: Box<dyn Handler>) -> Result<usize, Error> {
        let mut core = self.lock();
        if core.depth != 0 {
            return Err(Error::MutationWithinTrack);
        }
        Ok(core.tree.add_handler(HandlerTree::ROOT, handler))
    }

    /// Removes every handler.
    ///
    /// # Errors
    /// `Error::MutationWithinTrack` while any track is open.
    pub fn clear_handlers(&self) -> Result<(), Error> {
        let mut core = self.lock();
        if core.depth != 0 {
            return Err(Error::MutationWithinTrack);
        }
        core.tree.clear();
        Ok(())
    }

    /// Mounts a pipeline under the tree root.
    ///
    /// # Errors
    /// `Error::MutationWithinTrack` while any track is open.
    pub fn install(&self, pipeline: Pipeline) -> Result<(), Error> {
        let mut core = self.lock();
        if core.depth != 0 {
            return Err(Error::MutationWithinTrack);
        }
        mount(&mut core.tree, HandlerTree::ROOT, pipeline);
        Ok(())
    }

    /// Hides `channels` on every visibility stage in the tree.
    pub fn hide_channels_everywhere(&self, channels: &[Channel]) {
        let mut core = self.lock();
        core.tree.walk_mut(|handler| {
            if let Some(visibility) = handler.as_visibility_mut() {
                for channel in channels {
                    visibility.also_hide(channel.clone());
                }
            }
        });
    }

    /// Sets the channel-margin width on every output stage.
    pub fn set_channel_width(&self, width: usize) {
        let mut core = self.lock();
        core.tree.walk_mut(|handler| {
            if let Some(output) = handler.as_output_mut() {
                output.set_left_margin(width);
            }
        });
    }

    /// Toggles hash-derived channel colors on every output stage.
    pub fn set_random_colors(&self, on: bool) {
        let mut core = self.lock();
        core.tree.walk_mut(|handler| {
            if let Some(output) = handler.as_output_mut() {
                output.set_random_colors(on);
            }
        });
    }

    /// Shuts the engine down: force-closes any open tracks (deepest first),
    /// tells every stage to flush, and turns all further operations into
    /// no-ops. Safe to call more than once.
    pub fn stop(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut core = self.lock();
        while core.titles.pop().is_some() {
            core.depth = core.depth.saturating_sub(1);
            let new_depth = core.depth;
            let _ = core.tree.dispatch(&Message::EndTrack {
                new_depth,
                timestamp: Local::now(),
            });
        }
        let _ = core.tree.dispatch(&Message::Shutdown);
    }

    /// Current track nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lock().depth
    }

    /// Number of installed handler stages.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.lock().tree.handler_count()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}

fn mount(tree: &mut HandlerTree, parent: usize, pipeline: Pipeline) {
    match pipeline {
        Pipeline::Sink(handler) => {
            tree.add_handler(parent, handler);
        }
        Pipeline::Chain(stages, rest) => {
            let mut at = parent;
            for stage in stages {
                at = tree.add_handler(at, stage);
            }
            mount(tree, at, *rest);
        }
        Pipeline::Branch(pipelines) => {
            for branch in pipelines {
                mount(tree, parent, branch);
            }
        }
    }
}
