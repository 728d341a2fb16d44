//! Snapshot-based undo/redo history manager.
//!
//! The history is one linear log of whole-timeline snapshots with a cursor:
//! - `entries[cursor]` is the state the timeline is in now
//! - entries past the cursor are the redo log, dropped on the next push
//! - the log is bounded; the oldest entry is evicted first
//! - a separate "original" snapshot backs hard reset
//!
//! # Usage
//!
//! ```ignore
//! let mut history = HistoryManager::new(50);
//!
//! // After loading, record the baseline
//! history.set_original(TimelineSnapshot::capture(&timeline));
//! history.push("Open", TimelineSnapshot::capture(&timeline));
//!
//! // After each discrete edit, record the new state
//! timeline.remove_event(3)?;
//! history.push("Remove event", TimelineSnapshot::capture(&timeline));
//!
//! // Undo
//! if let Some(prev) = history.undo() {
//!     prev.restore(&mut timeline);
//! }
//!
//! // Batch grouping (for drag gestures)
//! history.start_batch("Drag segment");
//! // ... many moves, push() calls are suppressed ...
//! history.end_batch(TimelineSnapshot::capture(&timeline));
//! ```

use crate::snapshot::TimelineSnapshot;

/// Default maximum number of history entries.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// A single entry in the history log.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// Human-readable label describing the action that produced this state.
    pub label: String,
    /// The timeline state at this point in history.
    pub snapshot: TimelineSnapshot,
}

/// Which history affordances are currently available.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    /// An original is recorded and the current state differs from it.
    pub can_reset: bool,
}

/// Manages undo/redo history using timeline snapshots.
#[derive(Debug)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    original: Option<TimelineSnapshot>,
    max_entries: usize,
    /// When Some, we are in batch mode and push() calls are suppressed.
    batch_label: Option<String>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl HistoryManager {
    /// Create a history manager keeping at most `max_entries` snapshots (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            original: None,
            max_entries: max_entries.max(1),
            batch_label: None,
        }
    }

    /// Record the baseline used by [`reset`](Self::reset).
    ///
    /// Settable once per load; call [`clear`](Self::clear) before loading anew.
    pub fn set_original(&mut self, snapshot: TimelineSnapshot) {
        if self.original.is_some() {
            tracing::warn!("Original snapshot already set, ignoring");
            return;
        }
        tracing::debug!(events = snapshot.len(), "Original snapshot recorded");
        self.original = Some(snapshot);
    }

    /// Append a snapshot of the state after an action.
    ///
    /// - Drops the redo log beyond the cursor.
    /// - Evicts the oldest entry when over capacity.
    /// - Suppressed while a batch is open.
    pub fn push(&mut self, label: &str, snapshot: TimelineSnapshot) {
        if self.batch_label.is_some() {
            tracing::debug!(label, "Push suppressed: batch in progress");
            return;
        }
        self.append(label.to_string(), snapshot);
    }

    /// Step back one entry. Returns a copy of the snapshot to restore, or
    /// `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<TimelineSnapshot> {
        self.end_stuck_batch("undo");

        if self.entries.is_empty() || self.cursor == 0 {
            return None;
        }

        let label = self.entries[self.cursor].label.clone();
        self.cursor -= 1;
        tracing::debug!(label = %label, cursor = self.cursor, "Undo");
        Some(self.entries[self.cursor].snapshot.clone())
    }

    /// Step forward one entry. Returns a copy of the snapshot to restore, or
    /// `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<TimelineSnapshot> {
        self.end_stuck_batch("redo");

        if self.cursor + 1 >= self.entries.len() {
            return None;
        }

        self.cursor += 1;
        tracing::debug!(
            label = %self.entries[self.cursor].label,
            cursor = self.cursor,
            "Redo"
        );
        Some(self.entries[self.cursor].snapshot.clone())
    }

    /// Push a fresh copy of the original and return it, so a reset can itself
    /// be undone. No-op when no original is recorded.
    pub fn reset(&mut self) -> Option<TimelineSnapshot> {
        self.end_stuck_batch("reset");

        let original = self.original.clone()?;
        self.append("Reset".to_string(), original.clone());
        tracing::debug!(cursor = self.cursor, "Reset to original");
        Some(original)
    }

    /// Start a batch. While batching, individual `push()` calls are suppressed
    /// and [`end_batch`](Self::end_batch) records a single entry.
    pub fn start_batch(&mut self, label: &str) {
        if self.batch_label.is_some() {
            tracing::warn!(label, "start_batch called while already batching, ignoring");
            return;
        }
        self.batch_label = Some(label.to_string());
        tracing::debug!(label, "Batch started");
    }

    /// Close the batch and record `snapshot` as one entry under the batch label.
    ///
    /// If no batch is in progress, this is a no-op.
    pub fn end_batch(&mut self, snapshot: TimelineSnapshot) {
        let Some(label) = self.batch_label.take() else {
            return;
        };
        self.append(label, snapshot);
        tracing::debug!(cursor = self.cursor, "Batch ended, entry pushed");
    }

    /// Close the batch without recording anything.
    pub fn cancel_batch(&mut self) {
        if let Some(label) = self.batch_label.take() {
            tracing::debug!(label = %label, "Batch cancelled");
        }
    }

    /// Whether a batch operation is currently in progress.
    pub fn is_batching(&self) -> bool {
        self.batch_label.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn can_reset(&self) -> bool {
        match (&self.original, self.current()) {
            (Some(original), Some(current)) => original != current,
            (Some(_), None) => true,
            _ => false,
        }
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            can_reset: self.can_reset(),
        }
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&TimelineSnapshot> {
        self.entries.get(self.cursor).map(|e| &e.snapshot)
    }

    pub fn original(&self) -> Option<&TimelineSnapshot> {
        self.original.as_ref()
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries.get(self.cursor).map(|e| e.label.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.entries.get(self.cursor + 1).map(|e| e.label.as_str())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of entries in the log (including the redo log).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries, the original, and any open batch.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.original = None;
        self.batch_label = None;
        tracing::debug!("History cleared");
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Set the maximum number of entries. Trims the oldest entries if needed.
    pub fn set_max_entries(&mut self, max: usize) {
        self.max_entries = max.max(1);
        self.evict();
    }

    fn append(&mut self, label: String, snapshot: TimelineSnapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(HistoryEntry { label, snapshot });
        self.cursor = self.entries.len() - 1;
        self.evict();

        tracing::debug!(
            entries = self.entries.len(),
            cursor = self.cursor,
            "History entry pushed"
        );
    }

    fn evict(&mut self) {
        let excess = self.entries.len().saturating_sub(self.max_entries);
        if excess > 0 {
            self.entries.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
    }

    /// End any stuck batch first (lost pointer-up, etc.).
    fn end_stuck_batch(&mut self, op: &str) {
        if self.batch_label.take().is_some() {
            tracing::warn!(op, "Ending stuck batch");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_timeline::{EventKind, SyncEvent};

    /// Create a minimal snapshot whose single PLAY sits at `t`.
    fn make_snapshot(t: f64) -> TimelineSnapshot {
        TimelineSnapshot {
            events: vec![
                SyncEvent::new(EventKind::Start, 0.0),
                SyncEvent::new(EventKind::Play, t),
            ],
        }
    }

    fn play_time(snap: &TimelineSnapshot) -> f64 {
        snap.events[1].reaction_time
    }

    #[test]
    fn new_history_is_empty() {
        let h = HistoryManager::new(50);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(!h.can_reset());
        assert!(h.is_empty());
        assert!(h.undo_label().is_none());
        assert!(h.redo_label().is_none());
    }

    #[test]
    fn undo_empty_returns_none() {
        let mut h = HistoryManager::new(50);
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
    }

    #[test]
    fn undo_at_first_entry_returns_none() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));
        assert!(h.undo().is_none());
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn push_and_undo() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));
        h.push("Action A", make_snapshot(2.0));
        h.push("Action B", make_snapshot(3.0));

        assert_eq!(h.undo_label(), Some("Action B"));
        assert_eq!(play_time(&h.undo().unwrap()), 2.0);
        assert_eq!(play_time(&h.undo().unwrap()), 1.0);
        assert!(h.undo().is_none());
        assert!(h.can_redo());
        assert_eq!(h.redo_label(), Some("Action A"));
    }

    #[test]
    fn redo_after_undo_restores_undone_snapshot() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));
        h.push("Move", make_snapshot(5.0));

        h.undo();
        let redone = h.redo().unwrap();
        assert_eq!(redone, make_snapshot(5.0));
        assert!(!h.can_redo());
        assert!(h.redo().is_none());
    }

    #[test]
    fn push_clears_redo_log() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));
        h.push("A", make_snapshot(2.0));
        h.push("B", make_snapshot(3.0));

        h.undo();
        h.undo();
        h.push("C", make_snapshot(4.0));
        assert!(!h.can_redo());
        assert_eq!(h.len(), 2);
        assert_eq!(play_time(h.current().unwrap()), 4.0);
    }

    #[test]
    fn history_bound_holds_for_any_overflow() {
        for k in 0..5 {
            let mut h = HistoryManager::new(3);
            for i in 0..(3 + k) {
                h.push("Edit", make_snapshot(i as f64));
            }
            assert_eq!(h.len(), 3);
            assert_eq!(h.cursor(), 2);
            assert_eq!(play_time(h.current().unwrap()), (2 + k) as f64);
        }
    }

    #[test]
    fn eviction_keeps_cursor_valid_after_undo() {
        let mut h = HistoryManager::new(3);
        h.push("A", make_snapshot(1.0));
        h.push("B", make_snapshot(2.0));
        h.push("C", make_snapshot(3.0));
        h.undo();
        h.push("D", make_snapshot(4.0));
        h.push("E", make_snapshot(5.0));

        assert_eq!(h.len(), 3);
        assert!(h.cursor() < h.len());
        assert_eq!(play_time(&h.undo().unwrap()), 4.0);
    }

    #[test]
    fn set_max_entries_trims() {
        let mut h = HistoryManager::new(10);
        for i in 0..8 {
            h.push("Edit", make_snapshot(i as f64));
        }
        h.set_max_entries(3);
        assert_eq!(h.len(), 3);
        assert_eq!(h.max_entries(), 3);
        assert_eq!(play_time(h.current().unwrap()), 7.0);
    }

    #[test]
    fn undo_returns_deep_copy() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));
        h.push("Move", make_snapshot(2.0));

        let mut restored = h.undo().unwrap();
        restored.events[1].reaction_time = 99.0;
        assert_eq!(play_time(h.current().unwrap()), 1.0);
    }

    #[test]
    fn reset_pushes_original_and_is_undoable() {
        let mut h = HistoryManager::new(50);
        h.set_original(make_snapshot(1.0));
        h.push("Open", make_snapshot(1.0));
        h.push("Move", make_snapshot(8.0));
        assert!(h.can_reset());

        let reset = h.reset().unwrap();
        assert_eq!(play_time(&reset), 1.0);
        assert_eq!(h.len(), 3);
        assert!(!h.can_reset());

        assert_eq!(play_time(&h.undo().unwrap()), 8.0);
    }

    #[test]
    fn reset_without_original_is_noop() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));
        assert!(h.reset().is_none());
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn original_is_set_once() {
        let mut h = HistoryManager::new(50);
        h.set_original(make_snapshot(1.0));
        h.set_original(make_snapshot(2.0));
        assert_eq!(play_time(h.original().unwrap()), 1.0);

        h.clear();
        assert!(h.original().is_none());
        h.set_original(make_snapshot(2.0));
        assert_eq!(play_time(h.original().unwrap()), 2.0);
    }

    #[test]
    fn batch_suppresses_pushes() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));

        h.start_batch("Drag segment");
        assert!(h.is_batching());
        h.push("Intermediate 1", make_snapshot(2.0));
        h.push("Intermediate 2", make_snapshot(3.0));
        assert_eq!(h.len(), 1);

        h.end_batch(make_snapshot(4.0));
        assert!(!h.is_batching());
        assert_eq!(h.len(), 2);
        assert_eq!(h.undo_label(), Some("Drag segment"));

        // One undo step restores the pre-gesture state.
        assert_eq!(play_time(&h.undo().unwrap()), 1.0);
    }

    #[test]
    fn cancel_batch_records_nothing() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));
        h.start_batch("Drag");
        h.cancel_batch();
        assert!(!h.is_batching());
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn end_batch_without_start_is_noop() {
        let mut h = HistoryManager::new(50);
        h.end_batch(make_snapshot(1.0));
        assert!(h.is_empty());
    }

    #[test]
    fn double_start_batch_keeps_first_label() {
        let mut h = HistoryManager::new(50);
        h.start_batch("First");
        h.start_batch("Second");
        h.end_batch(make_snapshot(1.0));
        h.push("Next", make_snapshot(2.0));
        h.undo();
        assert_eq!(h.redo_label(), Some("Next"));
        assert_eq!(h.entries[0].label, "First");
    }

    #[test]
    fn undo_ends_stuck_batch() {
        let mut h = HistoryManager::new(50);
        h.push("Open", make_snapshot(1.0));
        h.push("A", make_snapshot(2.0));
        h.start_batch("Stuck batch");

        assert!(h.undo().is_some());
        assert!(!h.is_batching());
    }

    #[test]
    fn status_reflects_cursor() {
        let mut h = HistoryManager::new(50);
        h.set_original(make_snapshot(1.0));
        h.push("Open", make_snapshot(1.0));
        assert_eq!(h.status(), HistoryStatus::default());

        h.push("Move", make_snapshot(2.0));
        assert_eq!(
            h.status(),
            HistoryStatus {
                can_undo: true,
                can_redo: false,
                can_reset: true
            }
        );

        h.undo();
        assert_eq!(
            h.status(),
            HistoryStatus {
                can_undo: false,
                can_redo: true,
                can_reset: false
            }
        );
    }

    #[test]
    fn clear_resets_everything() {
        let mut h = HistoryManager::new(50);
        h.set_original(make_snapshot(1.0));
        h.push("A", make_snapshot(1.0));
        h.push("B", make_snapshot(2.0));
        h.start_batch("Batch");

        h.clear();

        assert!(h.is_empty());
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(!h.can_reset());
        assert!(!h.is_batching());
    }
}
