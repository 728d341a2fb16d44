//! Error types for the editing session.

use rx_timeline::TimelineError;
use thiserror::Error;

/// Errors surfaced by [`EditSession`](crate::EditSession) and the drag controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Discrete edits are rejected while a drag gesture is active.
    #[error("A drag gesture is in progress")]
    DragInProgress,

    #[error("Nothing is selected")]
    NothingSelected,

    /// The session has not been opened, or was closed.
    #[error("No timeline is open")]
    NoSession,
}
