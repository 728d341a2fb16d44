//! `rx-timeline` -- The timeline editing model for reaction-sync sessions.
//!
//! A reaction session is an ordered list of [`SyncEvent`]s tying moments of the
//! recorded reaction to moments of the reference video. This crate provides:
//!
//! - **Model**: sorted event storage, PLAY/PAUSE segment pairing, validated edits
//! - **Positioning**: time ↔ pixel mapping with a zoom factor
//! - **Zoom**: clamped zoom level that republishes the canvas width
//! - **Recording**: building an event list while a reaction is captured
//! - **Playback**: resolving what the reference player should show at any time
//!
//! # Usage
//!
//! ```rust
//! use rx_timeline::{EventKind, SyncEvent, TimelineModel};
//!
//! let mut timeline = TimelineModel::new();
//! timeline
//!     .load(&[
//!         SyncEvent::new(EventKind::Start, 0.0),
//!         SyncEvent::new(EventKind::Play, 10.0),
//!         SyncEvent::new(EventKind::Pause, 20.0),
//!         SyncEvent::new(EventKind::End, 30.0),
//!     ])
//!     .unwrap();
//!
//! let segment = timeline.segments().next().unwrap();
//! assert_eq!(segment.duration(), 10.0);
//! timeline.duplicate_segment(&segment, 5.0).unwrap();
//! assert_eq!(timeline.len(), 6);
//! ```

pub mod error;
pub mod model;
pub mod playback;
pub mod position;
pub mod recorder;
pub mod types;
pub mod zoom;

// Re-export primary API
pub use error::TimelineError;
pub use model::{validate_committable, Segments, TimelineModel};
pub use playback::{
    reference_cue_at, PlayerCommand, PlayerStatus, ReferenceCue, ReferenceFollower,
    DEFAULT_SYNC_TOLERANCE_SECS,
};
pub use position::PositionMapper;
pub use recorder::SyncRecorder;
pub use types::{EventKind, Segment, SyncEvent};
pub use zoom::{ZoomChange, ZoomController, ZoomState};
