//! The timeline editing model: an ordered list of sync events plus the
//! segment view derived from it.
//!
//! Every operation validates before it mutates, so a rejected call leaves the
//! event list exactly as it was.

use tracing::{debug, warn};

use crate::error::TimelineError;
use crate::types::{EventKind, Segment, SyncEvent};

/// Owns the sync events of one editing session, sorted by reaction time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineModel {
    events: Vec<SyncEvent>,
}

impl TimelineModel {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the timeline wholesale with a validated, time-sorted copy.
    ///
    /// Fails with [`TimelineError::InvalidData`] if any event has a negative
    /// or non-finite reaction time; the current events are kept in that case.
    pub fn load(&mut self, events: &[SyncEvent]) -> Result<(), TimelineError> {
        validate_events(events)?;

        let mut sorted = events.to_vec();
        sort_events(&mut sorted);
        self.events = sorted;

        debug!(
            events = self.events.len(),
            segments = self.segments().count(),
            "Timeline loaded"
        );
        Ok(())
    }

    /// Replace the events with a snapshot that came from this model earlier
    /// (undo/redo/cancel). No validation is performed.
    pub fn restore(&mut self, events: Vec<SyncEvent>) {
        self.events = events;
        debug!(events = self.events.len(), "Timeline restored from snapshot");
    }

    /// Insert an event and re-sort. Ties keep insertion order.
    ///
    /// Returns the index the event landed at.
    pub fn add_event(&mut self, event: SyncEvent) -> Result<usize, TimelineError> {
        validate_event(self.events.len(), &event)?;

        // Equivalent to push + stable sort: the new event lands after any
        // equal-time peers.
        self.resort();
        let index = self
            .events
            .partition_point(|e| e.reaction_time <= event.reaction_time);
        self.events.insert(index, event);

        debug!(index, kind = %event.kind, time = event.reaction_time, "Event added");
        Ok(index)
    }

    /// Remove the event at `index`. START and END cannot be removed.
    pub fn remove_event(&mut self, index: usize) -> Result<SyncEvent, TimelineError> {
        let event = self.checked_editable(index)?;
        self.events.remove(index);
        debug!(index, kind = %event.kind, "Event removed");
        Ok(event)
    }

    /// Move the event at `index` to `new_time`, clamped to >= 0.
    ///
    /// Does not re-sort: callers moving several events call [`resort`](Self::resort)
    /// once at the end. Returns the stored (clamped) time.
    pub fn update_event_time(&mut self, index: usize, new_time: f64) -> Result<f64, TimelineError> {
        self.checked_editable(index)?;
        if !new_time.is_finite() {
            return Err(TimelineError::InvalidData {
                index,
                reason: format!("new time {new_time} is not finite"),
            });
        }

        let moved = self.events[index].shifted_to(new_time);
        self.events[index] = moved;
        Ok(moved.reaction_time)
    }

    /// Stable sort by reaction time.
    pub fn resort(&mut self) {
        sort_events(&mut self.events);
    }

    /// Lazily pair each PLAY with the next PAUSE.
    ///
    /// START/END are skipped while scanning. A PLAY whose next PLAY/PAUSE is
    /// another PLAY stays unmatched and is not yielded.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            events: &self.events,
            cursor: 0,
        }
    }

    /// The complete segment that `index` belongs to, if any.
    pub fn segment_at(&self, index: usize) -> Option<Segment> {
        self.segments().find(|s| s.contains_index(index))
    }

    /// Indices of events that are not part of a complete segment.
    /// These are rendered as single points.
    pub fn points(&self) -> Vec<usize> {
        let mut covered = vec![false; self.events.len()];
        for seg in self.segments() {
            covered[seg.play_index] = true;
            covered[seg.pause_index] = true;
        }
        covered
            .iter()
            .enumerate()
            .filter(|(_, c)| !**c)
            .map(|(i, _)| i)
            .collect()
    }

    /// Append a copy of the segment's PLAY and PAUSE shifted by `offset_seconds`,
    /// then re-sort. A negative offset stops at 0 so the copy keeps its duration.
    ///
    /// Returns the indices of the new PLAY and PAUSE after sorting.
    pub fn duplicate_segment(
        &mut self,
        segment: &Segment,
        offset_seconds: f64,
    ) -> Result<(usize, usize), TimelineError> {
        let play = *self.checked_kind(segment.play_index, EventKind::Play)?;
        let pause = *self.checked_kind(segment.pause_index, EventKind::Pause)?;
        if !offset_seconds.is_finite() {
            return Err(TimelineError::InvalidData {
                index: segment.play_index,
                reason: format!("offset {offset_seconds} is not finite"),
            });
        }

        let offset = offset_seconds.max(-play.reaction_time);
        let new_play = play.shifted_to(play.reaction_time + offset);
        let new_pause = pause.shifted_to(pause.reaction_time + offset);
        validate_event(self.events.len(), &new_play)?;
        validate_event(self.events.len() + 1, &new_pause)?;

        let play_index = self.add_event(new_play)?;
        let pause_index = self.add_event(new_pause)?;

        debug!(
            from = segment.start_time,
            to = new_play.reaction_time,
            offset_seconds,
            "Segment duplicated"
        );
        Ok((play_index, pause_index))
    }

    /// All events in reaction-time order.
    pub fn events(&self) -> &[SyncEvent] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&SyncEvent> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Latest reaction time on the timeline (0 when empty).
    pub fn max_time(&self) -> f64 {
        self.events
            .iter()
            .map(|e| e.reaction_time)
            .fold(0.0_f64, f64::max)
    }

    /// Whether the events are non-decreasing by reaction time.
    pub fn is_sorted(&self) -> bool {
        self.events
            .windows(2)
            .all(|w| w[0].reaction_time <= w[1].reaction_time)
    }

    fn checked_index(&self, index: usize) -> Result<&SyncEvent, TimelineError> {
        self.events.get(index).ok_or(TimelineError::IndexOutOfBounds {
            index,
            len: self.events.len(),
        })
    }

    fn checked_editable(&self, index: usize) -> Result<SyncEvent, TimelineError> {
        let event = *self.checked_index(index)?;
        if event.is_boundary() {
            warn!(index, kind = %event.kind, "Rejected edit of protected event");
            return Err(TimelineError::ProtectedEvent {
                index,
                kind: event.kind,
            });
        }
        Ok(event)
    }

    fn checked_kind(&self, index: usize, kind: EventKind) -> Result<&SyncEvent, TimelineError> {
        let event = self.checked_index(index)?;
        if event.kind != kind {
            return Err(TimelineError::InvalidData {
                index,
                reason: format!("expected {kind}, found {}", event.kind),
            });
        }
        Ok(event)
    }
}

/// Iterator over the complete segments of a timeline.
///
/// Restartable: each call to [`TimelineModel::segments`] scans from the start.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    events: &'a [SyncEvent],
    cursor: usize,
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        while self.cursor < self.events.len() {
            let play_index = self.cursor;
            self.cursor += 1;
            if self.events[play_index].kind != EventKind::Play {
                continue;
            }

            let partner = self.events[play_index + 1..]
                .iter()
                .position(|e| !e.is_boundary())
                .map(|offset| play_index + 1 + offset);

            if let Some(pause_index) = partner {
                if self.events[pause_index].kind == EventKind::Pause {
                    self.cursor = pause_index + 1;
                    return Some(Segment {
                        play_index,
                        pause_index,
                        start_time: self.events[play_index].reaction_time,
                        end_time: self.events[pause_index].reaction_time,
                    });
                }
            }
        }
        None
    }
}

/// Check every complete segment has a positive duration.
///
/// Used before an edited timeline is written out.
pub fn validate_committable(events: &[SyncEvent]) -> Result<(), TimelineError> {
    validate_events(events)?;
    let segments = Segments { events, cursor: 0 };
    for seg in segments {
        if seg.duration() <= 0.0 {
            return Err(TimelineError::InvalidData {
                index: seg.play_index,
                reason: format!(
                    "segment {}..{} has non-positive duration {}",
                    seg.start_time,
                    seg.end_time,
                    seg.duration()
                ),
            });
        }
    }
    Ok(())
}

fn validate_events(events: &[SyncEvent]) -> Result<(), TimelineError> {
    events
        .iter()
        .enumerate()
        .try_for_each(|(index, event)| validate_event(index, event))
}

fn validate_event(index: usize, event: &SyncEvent) -> Result<(), TimelineError> {
    if !event.reaction_time.is_finite() {
        return Err(TimelineError::InvalidData {
            index,
            reason: format!("reaction_time {} is not finite", event.reaction_time),
        });
    }
    if event.reaction_time < 0.0 {
        return Err(TimelineError::InvalidData {
            index,
            reason: format!("reaction_time {} is negative", event.reaction_time),
        });
    }
    Ok(())
}

fn sort_events(events: &mut [SyncEvent]) {
    events.sort_by(|a, b| a.reaction_time.total_cmp(&b.reaction_time));
}
