//! Selected-event state management.

use serde::{Deserialize, Serialize};

/// Tracks which timeline events are currently selected, by index.
///
/// Indices refer to the sorted event list, so the selection is cleared
/// whenever the list is replaced (load, undo, redo, reset).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SelectionState {
    selected: Vec<usize>,
    /// Whether multi-select mode is active (e.g., Shift or Ctrl held).
    multi_select: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an event. If `multi` is false, clears the previous selection first.
    pub fn select(&mut self, index: usize, multi: bool) {
        if !multi {
            self.selected.clear();
        }
        // Avoid duplicates
        if !self.selected.contains(&index) {
            self.selected.push(index);
        }
        self.multi_select = multi;
    }

    /// Add the event if unselected, remove it otherwise.
    pub fn toggle(&mut self, index: usize) {
        if self.is_selected(index) {
            self.deselect(index);
        } else {
            self.select(index, true);
        }
    }

    pub fn deselect(&mut self, index: usize) {
        self.selected.retain(|i| *i != index);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.multi_select = false;
    }

    /// Selected indices in selection order.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// The most recently selected index.
    pub fn primary(&self) -> Option<usize> {
        self.selected.last().copied()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Number of selected events.
    pub fn count(&self) -> usize {
        self.selected.len()
    }
}
