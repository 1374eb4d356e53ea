//! Undo/redo stacks, bundle accumulation, and dirty tracking
//!
//! The log is a plain stack machine: it owns the history but never touches
//! the level. Applying records and notifying observers is the projector's
//! job; the projector drives the log through the operations here.

use crate::record::{Bundle, ChangeRecord};

/// Whether a bundle is currently accumulating records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogState {
    Idle,
    BundleOpen,
}

/// Command log: undo/redo stacks plus a save marker.
///
/// Dirty tracking works by depth: `mark_saved` records the current undo
/// depth as clean, and the level counts as dirty whenever the depth differs
/// from that mark, in either direction.
#[derive(Debug, Default)]
pub struct ChangeLog {
    undo: Vec<ChangeRecord>,
    redo: Vec<ChangeRecord>,
    /// Open bundle accumulator: description plus records absorbed so far
    bundle: Option<(String, Vec<ChangeRecord>)>,
    clean_depth: usize,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LogState {
        if self.bundle.is_some() {
            LogState::BundleOpen
        } else {
            LogState::Idle
        }
    }

    /// Open a bundle; subsequent records are absorbed instead of logged.
    /// Returns `false` if a bundle is already open.
    pub fn open_bundle(&mut self, description: impl Into<String>) -> bool {
        if self.bundle.is_some() {
            return false;
        }
        self.bundle = Some((description.into(), Vec::new()));
        true
    }

    /// Close the open bundle and return it as a single record. `None` when
    /// no bundle is open.
    pub fn close_bundle(&mut self) -> Option<Bundle> {
        self.bundle
            .take()
            .map(|(description, items)| Bundle { description, items })
    }

    /// Absorb `record` into the open bundle. When no bundle is open the
    /// record is handed back to the caller unchanged.
    pub fn absorb(&mut self, record: ChangeRecord) -> Result<(), ChangeRecord> {
        match &mut self.bundle {
            Some((_, items)) => {
                items.push(record);
                Ok(())
            }
            None => Err(record),
        }
    }

    /// Log a new entry: push onto the undo stack and clear the redo stack.
    pub fn commit(&mut self, record: ChangeRecord) {
        self.undo.push(record);
        self.redo.clear();
    }

    /// Raw push used by redo; does not clear the redo stack.
    pub fn push_undo(&mut self, record: ChangeRecord) {
        self.undo.push(record);
    }

    pub fn pop_undo(&mut self) -> Option<ChangeRecord> {
        self.undo.pop()
    }

    pub fn push_redo(&mut self, record: ChangeRecord) {
        self.redo.push(record);
    }

    pub fn pop_redo(&mut self) -> Option<ChangeRecord> {
        self.redo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Label of the entry `undo` would revert next.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo.last().map(|r| r.description())
    }

    /// Label of the entry `redo` would reapply next.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo.last().map(|r| r.description())
    }

    /// Current undo depth.
    pub fn depth(&self) -> usize {
        self.undo.len()
    }

    /// Record the current undo depth as the clean (saved) state.
    pub fn mark_saved(&mut self) {
        self.clean_depth = self.undo.len();
    }

    /// Whether the undo depth differs from the last saved depth.
    pub fn is_dirty(&self) -> bool {
        self.undo.len() != self.clean_depth
    }

    /// Drop all history and reset the clean depth. Used when a different
    /// save file is loaded: the fresh state becomes the non-undoable
    /// baseline.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.bundle = None;
        self.clean_depth = 0;
    }
}
