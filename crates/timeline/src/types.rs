//! Timeline data types: sync events and the segments derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a sync event marks.
///
/// `Start`/`End` bound the recording session and are immutable.
/// `Play`/`Pause` mark reference-playback transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "end")]
    End,
    #[serde(rename = "youtube_play")]
    Play,
    #[serde(rename = "youtube_pause")]
    Pause,
}

impl EventKind {
    /// Wire name used in timestamp files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Play => "youtube_play",
            Self::Pause => "youtube_pause",
        }
    }

    /// Whether this is a session boundary marker (START or END).
    pub fn is_boundary(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "youtube_play" => Ok(Self::Play),
            "youtube_pause" => Ok(Self::Pause),
            other => Err(format!("unknown event kind '{other}'")),
        }
    }
}

/// A single instant on the reaction timeline tied to the reference timeline.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Position on the reaction timeline in seconds (always >= 0).
    pub reaction_time: f64,
    /// Matching position on the reference timeline; `None` before the
    /// reference has ever started.
    pub reference_time: Option<f64>,
    /// `reaction_time - reference_first_start_time`, once the reference has started.
    pub relative_reference_time: Option<f64>,
    pub kind: EventKind,
    /// Reaction time at which the reference first started playing.
    /// Shared by every event of a session.
    pub reference_first_start_time: Option<f64>,
}

impl SyncEvent {
    /// Create an event with no reference information attached.
    pub fn new(kind: EventKind, reaction_time: f64) -> Self {
        Self {
            reaction_time,
            reference_time: None,
            relative_reference_time: None,
            kind,
            reference_first_start_time: None,
        }
    }

    /// Attach the reference-side time.
    pub fn with_reference_time(mut self, reference_time: f64) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    /// Attach the session's first reference start and derive the relative time.
    pub fn with_first_start(mut self, first_start: f64) -> Self {
        self.reference_first_start_time = Some(first_start);
        self.relative_reference_time = Some(self.reaction_time - first_start);
        self
    }

    pub fn is_boundary(&self) -> bool {
        self.kind.is_boundary()
    }

    /// Copy of this event moved to `reaction_time` (clamped to >= 0).
    pub(crate) fn shifted_to(&self, reaction_time: f64) -> Self {
        let mut event = *self;
        event.reaction_time = reaction_time.max(0.0);
        if let Some(first) = event.reference_first_start_time {
            event.relative_reference_time = Some(event.reaction_time - first);
        }
        event
    }
}

/// A derived PLAY→PAUSE pair: one continuous playback interval of the reference.
///
/// Segments are views computed from the event list; they own nothing and are
/// invalidated by any mutation of the timeline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    /// Index of the PLAY event in the timeline.
    pub play_index: usize,
    /// Index of the matching PAUSE event in the timeline.
    pub pause_index: usize,
    pub start_time: f64,
    pub end_time: f64,
}

impl Segment {
    /// `pause.reaction_time - play.reaction_time`.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whether `index` is one of this segment's two events.
    pub fn contains_index(&self, index: usize) -> bool {
        index == self.play_index || index == self.pause_index
    }
}
