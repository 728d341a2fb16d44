//! `rx-app-state` -- Editing session state for the reaction timeline editor.
//!
//! This crate provides:
//!
//! - **`EditSession`**: One open timeline with its history, zoom, selection and gesture routing.
//! - **`HistoryManager`**: Snapshot-based undo/redo with batching and reset-to-original.
//! - **`TimelineSnapshot`**: Deep copy of the event list used by history.
//! - **`DragController`**: Point and segment dragging in individual or sync (ripple) mode.
//! - **`SelectionState`**: Which events are selected.
//!
//! # Architecture
//!
//! ```text
//! EditSession
//! ├── timeline: TimelineModel        (sorted events)
//! ├── history: HistoryManager        (snapshots + cursor)
//! ├── drag: DragController           (active gesture, start snapshot)
//! ├── zoom: ZoomController           (level, canvas width)
//! └── selection: SelectionState      (selected indices)
//!
//! GestureEvent ──► EditSession::handle ──► Vec<SessionEvent>
//! ```

pub mod drag;
pub mod error;
pub mod gesture;
pub mod history;
pub mod selection;
pub mod session;
pub mod snapshot;

// Re-export primary types at crate root for convenience.
pub use drag::{DragController, DragMode, DragOutcome, DragTarget};
pub use error::SessionError;
pub use gesture::{key_action, GestureEvent, KeyAction, KeyCode, Modifiers};
pub use history::{HistoryEntry, HistoryManager, HistoryStatus, DEFAULT_MAX_ENTRIES};
pub use selection::SelectionState;
pub use session::{EditSession, SessionEvent};
pub use snapshot::TimelineSnapshot;
