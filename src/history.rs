//! Linear undo/redo over full graph snapshots.
//!
//! DESIGN
//! ======
//! The undo stack holds states, not operations: its top is always the
//! current graph. Committing pushes the new state and clears the redo stack.
//! Undo moves the top onto the redo stack and exposes the state beneath it;
//! redo is the mirror. The bottom entry (the loaded document) is never
//! popped, so undo right after load is a no-op.
//!
//! Depth is capped: once more than `limit` undoable steps exist, the oldest
//! steps are discarded. Snapshots are stored normalized (no transient
//! selection-source flag).

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::consts::HISTORY_LIMIT;
use crate::model::Graph;

/// Reason tag used for the seeded entry.
pub const LOAD_REASON: &str = "load";

/// One history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Human-readable tag, e.g. `"move"`, `"delete"`, `"align-left"`.
    pub reason: String,
    pub graph: Graph,
}

/// State restored by [`History::undo`] or [`History::redo`].
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    /// Reason of the step that was undone or redone.
    pub reason: String,
    /// Graph to install as the live state.
    pub graph: Graph,
}

#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl History {
    /// Empty history keeping at most `limit` undoable steps (minimum 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { undo: Vec::new(), redo: Vec::new(), limit: limit.max(1) }
    }

    /// Drop everything and start over from `graph`.
    pub fn seed(&mut self, graph: &Graph) {
        self.undo.clear();
        self.redo.clear();
        self.undo.push(Snapshot { reason: LOAD_REASON.to_string(), graph: graph.normalized() });
    }

    /// Record `graph` as the new current state.
    ///
    /// Returns `false` (and records nothing) when `graph` equals the current
    /// state. An unseeded history treats the first commit as its base.
    pub fn commit(&mut self, reason: &str, graph: &Graph) -> bool {
        let graph = graph.normalized();
        if self.undo.last().is_some_and(|top| top.graph == graph) {
            return false;
        }
        self.undo.push(Snapshot { reason: reason.to_string(), graph });
        self.redo.clear();

        let max_entries = self.limit + 1;
        if self.undo.len() > max_entries {
            let excess = self.undo.len() - max_entries;
            self.undo.drain(..excess);
        }
        true
    }

    /// Step back one entry. `None` when nothing is undoable.
    pub fn undo(&mut self) -> Option<Restored> {
        if self.undo.len() < 2 {
            return None;
        }
        let popped = self.undo.pop()?;
        let reason = popped.reason.clone();
        self.redo.push(popped);
        let current = self.undo.last()?;
        Some(Restored { reason, graph: current.graph.clone() })
    }

    /// Re-apply the most recently undone entry. `None` when the redo stack is empty.
    pub fn redo(&mut self) -> Option<Restored> {
        let entry = self.redo.pop()?;
        let restored = Restored { reason: entry.reason.clone(), graph: entry.graph.clone() };
        self.undo.push(entry);
        Some(restored)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable steps.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len().saturating_sub(1)
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The current state, if seeded.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo.last()
    }

    /// Reason of the step the next undo would revert.
    #[must_use]
    pub fn undo_reason(&self) -> Option<&str> {
        if self.can_undo() { self.undo.last().map(|s| s.reason.as_str()) } else { None }
    }

    /// Reason of the step the next redo would re-apply.
    #[must_use]
    pub fn redo_reason(&self) -> Option<&str> {
        self.redo.last().map(|s| s.reason.as_str())
    }
}
