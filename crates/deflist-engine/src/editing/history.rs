//! # Undo/Redo History
//!
//! Snapshot-based: before each successful edit the session records the tree
//! and selection as they were. Undo swaps the current state with the latest
//! snapshot and keeps the current one for redo. New edits clear the redo
//! stack.

use std::collections::VecDeque;

use crate::tree::{Selection, Tree};

/// Tree and selection as they were at some point in the session.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub tree: Tree,
    pub selection: Selection,
}

/// Default number of undo levels kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Checkpoint>,
    redo_stack: Vec<Checkpoint>,
    /// Maximum number of undo levels (0 = unlimited)
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Record the state before an edit.
    pub fn record(&mut self, before: Checkpoint) {
        self.undo_stack.push_back(before);
        if self.limit > 0 && self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Step back: returns the state to restore, keeping `current` for redo.
    pub fn undo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}
