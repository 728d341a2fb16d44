//! Error types for the timeline model.

use thiserror::Error;

use crate::types::EventKind;

/// Errors that can occur while loading or editing a timeline.
///
/// Negative times are clamped rather than reported, and undo/redo with
/// nothing available returns `None`, so neither has a variant here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// A sync event is malformed or missing a required field.
    #[error("Invalid sync data at index {index}: {reason}")]
    InvalidData { index: usize, reason: String },

    /// START and END markers cannot be removed or retimed.
    #[error("Event {index} is a protected {kind} marker")]
    ProtectedEvent { index: usize, kind: EventKind },

    #[error("Event index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Recorder is not recording")]
    NotRecording,

    #[error("Recorder is already recording")]
    AlreadyRecording,
}
