//! Drag-to-retime gesture handling.
//!
//! A drag goes `Idle → Dragging → Idle`. At gesture start the controller
//! captures the pointer position, the dragged event's time and a snapshot of
//! the whole timeline. Every move recomputes positions from that snapshot, so
//! a gesture never accumulates drift no matter how many moves arrive.

use rx_timeline::{EventKind, PositionMapper, TimelineError, TimelineModel};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::snapshot::TimelineSnapshot;

/// What a drag moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragTarget {
    /// A single event rendered as a point.
    Point(usize),
    /// A PLAY/PAUSE pair moved together.
    Segment { play_index: usize, pause_index: usize },
}

impl DragTarget {
    /// Index of the earliest event the drag moves.
    pub fn anchor_index(&self) -> usize {
        match *self {
            Self::Point(index) => index,
            Self::Segment { play_index, .. } => play_index,
        }
    }
}

/// Propagation policy for a drag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DragMode {
    /// Only the dragged point or segment moves.
    #[default]
    Individual,
    /// Every non-boundary event from the dragged one onward translates rigidly.
    Sync,
}

/// Result of a completed gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragOutcome {
    pub target: DragTarget,
    pub mode: DragMode,
    /// Applied shift of the dragged event in seconds (after clamping).
    pub delta: f64,
    /// Whether any event time differs from the pre-drag snapshot.
    pub changed: bool,
}

#[derive(Clone, Debug)]
struct ActiveDrag {
    target: DragTarget,
    mode: DragMode,
    start_pointer_x: f64,
    drag_start_time: f64,
    /// Pause time minus play time for segment drags.
    duration: f64,
    original: TimelineSnapshot,
    delta: f64,
}

/// Interprets pointer drags into timeline edits.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    sync_mode: bool,
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new(sync_mode: bool) -> Self {
        Self {
            sync_mode,
            active: None,
        }
    }

    /// Takes effect at the next gesture; an active drag keeps its mode.
    pub fn set_sync_mode(&mut self, sync_mode: bool) {
        self.sync_mode = sync_mode;
    }

    pub fn sync_mode(&self) -> bool {
        self.sync_mode
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Target of the active drag.
    pub fn target(&self) -> Option<DragTarget> {
        self.active.as_ref().map(|a| a.target)
    }

    /// Mode of the active drag.
    pub fn mode(&self) -> Option<DragMode> {
        self.active.as_ref().map(|a| a.mode)
    }

    /// Enter `Dragging` on `target`.
    ///
    /// START/END cannot be dragged; a segment target must name a PLAY and a
    /// PAUSE. Nothing is captured when the target is rejected.
    pub fn begin(
        &mut self,
        timeline: &TimelineModel,
        target: DragTarget,
        pointer_x: f64,
    ) -> Result<DragMode, SessionError> {
        if self.active.is_some() {
            return Err(SessionError::DragInProgress);
        }

        let (drag_start_time, duration) = match target {
            DragTarget::Point(index) => (editable_time(timeline, index, None)?, 0.0),
            DragTarget::Segment {
                play_index,
                pause_index,
            } => {
                let start = editable_time(timeline, play_index, Some(EventKind::Play))?;
                let end = editable_time(timeline, pause_index, Some(EventKind::Pause))?;
                (start, end - start)
            }
        };

        let mode = if self.sync_mode {
            DragMode::Sync
        } else {
            DragMode::Individual
        };

        self.active = Some(ActiveDrag {
            target,
            mode,
            start_pointer_x: pointer_x,
            drag_start_time,
            duration,
            original: TimelineSnapshot::capture(timeline),
            delta: 0.0,
        });
        debug!(?target, ?mode, start_time = drag_start_time, "Drag started");
        Ok(mode)
    }

    /// Apply a pointer move. Returns the dragged event's new time, or `None`
    /// when idle.
    ///
    /// The list is not re-sorted until [`release`](Self::release).
    pub fn update(
        &mut self,
        timeline: &mut TimelineModel,
        pointer_x: f64,
        mapper: &PositionMapper,
    ) -> Option<f64> {
        let drag = self.active.as_mut()?;

        let delta_time = mapper.delta_time(pointer_x - drag.start_pointer_x);
        let new_time = (drag.drag_start_time + delta_time).max(0.0);
        drag.delta = new_time - drag.drag_start_time;

        let result = match drag.mode {
            DragMode::Individual => apply_individual(timeline, drag, new_time),
            DragMode::Sync => apply_sync(timeline, drag),
        };
        if let Err(e) = result {
            // Indices were validated at begin and the list is not resorted
            // mid-gesture, so this only fires if the timeline was swapped under us.
            warn!(error = %e, "Drag update rejected");
        }
        Some(new_time)
    }

    /// Leave `Dragging`, re-sort the timeline and report what happened.
    pub fn release(&mut self, timeline: &mut TimelineModel) -> Option<DragOutcome> {
        let drag = self.active.take()?;
        timeline.resort();

        let changed = drag.original.events.as_slice() != timeline.events();
        debug!(
            target = ?drag.target,
            delta = drag.delta,
            changed,
            "Drag released"
        );
        Some(DragOutcome {
            target: drag.target,
            mode: drag.mode,
            delta: drag.delta,
            changed,
        })
    }

    /// Abort the gesture and restore the exact pre-drag timeline.
    ///
    /// Returns `false` when no drag was active.
    pub fn cancel(&mut self, timeline: &mut TimelineModel) -> bool {
        let Some(drag) = self.active.take() else {
            return false;
        };
        drag.original.restore(timeline);
        debug!(target = ?drag.target, "Drag cancelled");
        true
    }
}

fn editable_time(
    timeline: &TimelineModel,
    index: usize,
    expected: Option<EventKind>,
) -> Result<f64, TimelineError> {
    let event = timeline.get(index).ok_or(TimelineError::IndexOutOfBounds {
        index,
        len: timeline.len(),
    })?;
    if event.is_boundary() {
        return Err(TimelineError::ProtectedEvent {
            index,
            kind: event.kind,
        });
    }
    if let Some(kind) = expected {
        if event.kind != kind {
            return Err(TimelineError::InvalidData {
                index,
                reason: format!("expected {kind}, found {}", event.kind),
            });
        }
    }
    Ok(event.reaction_time)
}

fn apply_individual(
    timeline: &mut TimelineModel,
    drag: &ActiveDrag,
    new_time: f64,
) -> Result<(), TimelineError> {
    match drag.target {
        DragTarget::Point(index) => {
            timeline.update_event_time(index, new_time)?;
        }
        DragTarget::Segment {
            play_index,
            pause_index,
        } => {
            timeline.update_event_time(play_index, new_time)?;
            timeline.update_event_time(pause_index, new_time + drag.duration)?;
        }
    }
    Ok(())
}

fn apply_sync(timeline: &mut TimelineModel, drag: &ActiveDrag) -> Result<(), TimelineError> {
    let anchor = drag.target.anchor_index();
    for (index, original) in drag.original.events.iter().enumerate().skip(anchor) {
        if original.is_boundary() {
            continue;
        }
        timeline.update_event_time(index, original.reaction_time + drag.delta)?;
    }
    Ok(())
}
