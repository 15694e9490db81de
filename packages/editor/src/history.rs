//! # Undo/Redo History
//!
//! Snapshot history over any cloneable state.
//!
//! ## Design
//!
//! - `set` records the current present into the past and clears the future
//! - Undo moves the present to the future and restores the latest past entry
//! - Redo is symmetric
//! - Every `set` is one step; rapid edits are never coalesced
//! - Snapshots are owned values, so a past entry never aliases the present
//!
//! ## Example
//!
//! ```rust
//! use pagecraft_editor::History;
//!
//! let mut history = History::new(0);
//! history.set(1);
//! history.set(2);
//!
//! history.undo();
//! assert_eq!(*history.present(), 1);
//!
//! history.redo();
//! assert_eq!(*history.present(), 2);
//! ```

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History<T> {
    /// Oldest first
    past: VecDeque<T>,

    present: T,

    /// Next redo first
    future: Vec<T>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_max_levels(initial, 0)
    }

    pub fn with_max_levels(initial: T, max_levels: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: Vec::new(),
            max_levels,
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    /// Commit a new present
    pub fn set(&mut self, next: T) {
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push_back(previous);

        if self.max_levels > 0 && self.past.len() > self.max_levels {
            self.past.pop_front();
        }

        // New action invalidates future
        self.future.clear();
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        true
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    /// Drop all history and start over from `initial`
    pub fn reset(&mut self, initial: T) {
        self.past.clear();
        self.future.clear();
        self.present = initial;
    }
}

impl<T: Clone + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
