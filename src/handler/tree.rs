//! The tree of stages every record and signal flows through.
//!
//! Nodes live in an arena indexed by `usize`; the root (index 0) wraps no
//! stage and exists only to fan out to its children. Structural mutation is
//! only legal while no track is open — that invariant is checked at the
//! `Logger` API boundary, not here.

use super::{Handler, Message};
use crate::error::Error;

struct Node {
    /// `None` only for the root.
    handler: Option<Box<dyn Handler>>,
    children: Vec<usize>,
}

/// Arena-backed tree of handler stages.
pub struct HandlerTree {
    nodes: Vec<Node>,
}

impl Default for HandlerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerTree {
    /// Index of the root node.
    pub const ROOT: usize = 0;

    /// An empty tree: just the stage-less root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                handler: None,
                children: Vec::new(),
            }],
        }
    }

    /// Adds a stage as the last child of `parent`, returning its index so
    /// chains can be built by threading the result.
    pub fn add_handler(&mut self, parent: usize, handler: Box<dyn Handler>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            handler: Some(handler),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Drops every stage, leaving the bare root.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[Self::ROOT].children.clear();
    }

    /// Number of stages in the tree (the root does not count).
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.handler.is_some()).count()
    }

    /// Visits every stage in pre-order (parent before children) with an
    /// explicit stack, supporting tree-wide operations like hiding a
    /// channel on every visibility stage.
    pub fn walk_mut(&mut self, mut visit: impl FnMut(&mut dyn Handler)) {
        let mut pending = vec![Self::ROOT];
        while let Some(idx) = pending.pop() {
            // reversed so the leftmost child is visited first
            for &child in self.nodes[idx].children.iter().rev() {
                pending.push(child);
            }
            if let Some(handler) = self.nodes[idx].handler.as_deref_mut() {
                visit(handler);
            }
        }
    }

    /// Pushes a message into the root and recursively dispatches it.
    pub(crate) fn dispatch(&mut self, message: &Message) -> Result<(), Error> {
        self.process(Self::ROOT, message)
    }

    fn process(&mut self, idx: usize, message: &Message) -> Result<(), Error> {
        // Run this node's stage; the root forwards plain records unchanged
        // and is silent for structural signals.
        let derived = match self.nodes[idx].handler.as_deref_mut() {
            Some(handler) => match message {
                Message::Simple(record) => handler.handle(record)?,
                Message::StartTrack(signal) => handler.start_track(signal)?,
                Message::EndTrack {
                    new_depth,
                    timestamp,
                } => handler.end_track(*new_depth, *timestamp)?,
                Message::Shutdown => handler.shutdown()?,
            },
            None => match message {
                Message::Simple(record) => vec![record.clone()],
                _ => Vec::new(),
            },
        };

        let children = self.nodes[idx].children.clone();
        let derived: Vec<Message> = derived.into_iter().map(Message::Simple).collect();
        for child in children {
            // Derived pre-records must be fully rendered by descendants
            // before the structural signal that produced them arrives.
            for msg in &derived {
                self.process(child, msg)?;
            }
            match message {
                Message::StartTrack(_) | Message::EndTrack { .. } | Message::Shutdown => {
                    self.process(child, message)?;
                }
                Message::Simple(_) => {}
            }
        }
        Ok(())
    }
}
