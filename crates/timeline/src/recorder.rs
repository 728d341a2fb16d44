//! Builds a timeline while a reaction is being recorded.
//!
//! The recorder does not own a clock or a player. The caller forwards the
//! reaction-recording time and the reference player's time whenever the
//! reference starts or stops, and collects the finished event list on stop.

use tracing::{debug, info};

use crate::error::TimelineError;
use crate::types::{EventKind, SyncEvent};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum RecorderState {
    #[default]
    Idle,
    Recording {
        reference_playing: bool,
    },
}

/// Collects sync events during a recording session.
#[derive(Clone, Debug, Default)]
pub struct SyncRecorder {
    state: RecorderState,
    events: Vec<SyncEvent>,
    first_start: Option<f64>,
    last_time: f64,
}

impl SyncRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session. Emits START at reaction time 0.
    pub fn start(&mut self) -> Result<(), TimelineError> {
        if self.is_recording() {
            return Err(TimelineError::AlreadyRecording);
        }
        self.events.clear();
        self.first_start = None;
        self.last_time = 0.0;
        self.events.push(SyncEvent::new(EventKind::Start, 0.0));
        self.state = RecorderState::Recording {
            reference_playing: false,
        };
        info!("Sync recording started");
        Ok(())
    }

    /// The reference started playing. Ignored if it is already playing.
    pub fn reference_played(
        &mut self,
        reaction_time: f64,
        reference_time: f64,
    ) -> Result<(), TimelineError> {
        let RecorderState::Recording { reference_playing } = self.state else {
            return Err(TimelineError::NotRecording);
        };
        if reference_playing {
            debug!(reaction_time, "Duplicate play ignored");
            return Ok(());
        }

        let t = self.monotonic(reaction_time);
        let first = *self.first_start.get_or_insert(t);
        self.events.push(
            SyncEvent::new(EventKind::Play, t)
                .with_reference_time(reference_time)
                .with_first_start(first),
        );
        self.state = RecorderState::Recording {
            reference_playing: true,
        };
        debug!(reaction_time = t, reference_time, "Reference play recorded");
        Ok(())
    }

    /// The reference paused. Ignored if it is not playing.
    pub fn reference_paused(
        &mut self,
        reaction_time: f64,
        reference_time: f64,
    ) -> Result<(), TimelineError> {
        let RecorderState::Recording { reference_playing } = self.state else {
            return Err(TimelineError::NotRecording);
        };
        if !reference_playing {
            debug!(reaction_time, "Pause without play ignored");
            return Ok(());
        }

        let t = self.monotonic(reaction_time);
        self.push_with_reference(EventKind::Pause, t, Some(reference_time));
        self.state = RecorderState::Recording {
            reference_playing: false,
        };
        debug!(reaction_time = t, reference_time, "Reference pause recorded");
        Ok(())
    }

    /// End the session and hand back the recorded events.
    ///
    /// A reference that is still playing gets a closing PAUSE at the same
    /// instant. `reference_time` is the player position at stop, if known.
    pub fn stop(
        &mut self,
        reaction_time: f64,
        reference_time: Option<f64>,
    ) -> Result<Vec<SyncEvent>, TimelineError> {
        let RecorderState::Recording { reference_playing } = self.state else {
            return Err(TimelineError::NotRecording);
        };

        let t = self.monotonic(reaction_time);
        if reference_playing {
            self.push_with_reference(EventKind::Pause, t, reference_time);
        }
        self.push_with_reference(EventKind::End, t, reference_time);
        self.state = RecorderState::Idle;

        info!(
            events = self.events.len(),
            duration = t,
            "Sync recording stopped"
        );
        Ok(std::mem::take(&mut self.events))
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording { .. })
    }

    /// Events recorded so far in the current session.
    pub fn events(&self) -> &[SyncEvent] {
        &self.events
    }

    fn push_with_reference(&mut self, kind: EventKind, t: f64, reference_time: Option<f64>) {
        let mut event = SyncEvent::new(kind, t);
        if let Some(first) = self.first_start {
            event = event.with_first_start(first);
            if let Some(reference_time) = reference_time {
                event = event.with_reference_time(reference_time);
            }
        }
        self.events.push(event);
    }

    /// Reaction times never run backwards within a session.
    fn monotonic(&mut self, reaction_time: f64) -> f64 {
        let t = if reaction_time.is_finite() {
            reaction_time.max(self.last_time)
        } else {
            self.last_time
        };
        self.last_time = t;
        t
    }
}
