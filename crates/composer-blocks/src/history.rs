//! Undo/redo history over full block-list snapshots.
//!
//! ## Learning: Snapshots vs Commands
//!
//! A command-based history stores each edit with its inverse. A snapshot
//! history stores the whole state instead:
//! - Every entry is a deep copy of the block list
//! - Undo and redo just swap the current state for a stored one
//! - No inverse operations to get wrong
//!
//! ## The Cursor
//!
//! `snapshots[cursor]` is the state the document was in when the cursor
//! was last placed there. Mutations call [`History::save`] with the state
//! *before* they change anything. The state *after* the last mutation (the
//! live head) is only written to the stack on the first undo, so that redo
//! can get back to it.

use std::collections::VecDeque;

use crate::Block;

/// Snapshot-based undo/redo history.
///
/// ## Learning: VecDeque
///
/// We use `VecDeque` because we need efficient:
/// - Push to back (new snapshots)
/// - Pop from front (when a capacity is set)
/// - Truncate from the back (dropping the redo branch)
#[derive(Debug, Clone)]
pub struct History {
    /// Stored block-list states, oldest first
    snapshots: VecDeque<Vec<Block>>,
    /// Index of the snapshot matching the current state
    cursor: usize,
    /// Maximum number of snapshots to keep, unbounded if `None`
    max_size: Option<usize>,
}

impl History {
    /// Creates a history whose only snapshot is the empty document.
    ///
    /// With `max_size` set, the oldest snapshots are dropped once the stack
    /// grows past it and undo stops short of the empty document.
    pub fn new(max_size: Option<usize>) -> Self {
        let mut history = Self {
            snapshots: VecDeque::new(),
            cursor: 0,
            max_size: max_size.map(|max| max.max(2)),
        };
        history.reset(&[]);
        history
    }

    /// Drops every snapshot and starts over from `blocks`.
    ///
    /// Called when a session starts or a document is hydrated.
    pub fn reset(&mut self, blocks: &[Block]) {
        self.snapshots.clear();
        self.snapshots.push_back(blocks.to_vec());
        self.cursor = 0;
    }

    /// Records the pre-mutation state.
    ///
    /// Truncates the redo branch beyond the cursor, appends `current` and
    /// moves the cursor onto it. A snapshot equal to the one under the
    /// cursor is not stored twice.
    pub fn save(&mut self, current: &[Block]) {
        self.snapshots.truncate(self.cursor + 1);

        if self.snapshots.back().map(Vec::as_slice) == Some(current) {
            return;
        }

        self.snapshots.push_back(current.to_vec());
        self.cursor = self.snapshots.len() - 1;
        self.enforce_capacity();
    }

    /// Steps back one state.
    ///
    /// `current` is the live block list. Returns the blocks to restore, or
    /// `None` if there is nothing to undo.
    pub fn undo(&mut self, current: &[Block]) -> Option<Vec<Block>> {
        if self.is_live_head(current) {
            // Seal the live state so redo can return to it
            self.snapshots.truncate(self.cursor + 1);
            self.snapshots.push_back(current.to_vec());
            self.enforce_capacity();
            return self.snapshots.get(self.cursor).cloned();
        }

        if self.cursor == 0 {
            return None;
        }

        self.cursor -= 1;
        self.snapshots.get(self.cursor).cloned()
    }

    /// Steps forward one state.
    ///
    /// Returns the blocks to restore, or `None` if there is nothing to redo.
    pub fn redo(&mut self) -> Option<Vec<Block>> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }

        self.cursor += 1;
        self.snapshots.get(self.cursor).cloned()
    }

    /// Returns true if [`History::undo`] would restore something.
    pub fn can_undo(&self, current: &[Block]) -> bool {
        self.cursor > 0 || self.is_live_head(current)
    }

    /// Returns true if [`History::redo`] would restore something.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if no snapshots are stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns the snapshot under the cursor.
    pub fn current(&self) -> Option<&[Block]> {
        self.snapshots.get(self.cursor).map(Vec::as_slice)
    }

    /// The live state has moved past the snapshot under the cursor.
    fn is_live_head(&self, current: &[Block]) -> bool {
        self.cursor + 1 == self.snapshots.len()
            && self.snapshots.get(self.cursor).map(Vec::as_slice) != Some(current)
    }

    fn enforce_capacity(&mut self) {
        let Some(max_size) = self.max_size else {
            return;
        };
        while self.snapshots.len() > max_size && self.cursor > 0 {
            self.snapshots.pop_front();
            self.cursor -= 1;
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(None)
    }
}
