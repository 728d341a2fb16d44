//! Timeline snapshot for undo/redo.
//!
//! `TimelineSnapshot` is a deep, independent copy of the event list. Mutating
//! the live timeline never reaches a stored snapshot and vice versa.

use rx_timeline::{SyncEvent, TimelineModel};
use serde::{Deserialize, Serialize};

/// Whole-timeline snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    pub events: Vec<SyncEvent>,
}

impl TimelineSnapshot {
    /// Capture a snapshot from the current timeline.
    pub fn capture(timeline: &TimelineModel) -> Self {
        Self {
            events: timeline.events().to_vec(),
        }
    }

    /// Overwrite the timeline with a copy of this snapshot.
    pub fn restore(&self, timeline: &mut TimelineModel) {
        timeline.restore(self.events.clone());
        tracing::debug!(events = self.events.len(), "Snapshot restored");
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<&[SyncEvent]> for TimelineSnapshot {
    fn from(events: &[SyncEvent]) -> Self {
        Self {
            events: events.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_timeline::EventKind;

    fn make_timeline() -> TimelineModel {
        let mut tl = TimelineModel::new();
        tl.load(&[
            SyncEvent::new(EventKind::Start, 0.0),
            SyncEvent::new(EventKind::Play, 4.0),
            SyncEvent::new(EventKind::Pause, 9.0),
        ])
        .unwrap();
        tl
    }

    #[test]
    fn capture_is_independent_of_live_timeline() {
        let mut tl = make_timeline();
        let snap = TimelineSnapshot::capture(&tl);

        tl.update_event_time(1, 6.0).unwrap();
        assert_eq!(snap.events[1].reaction_time, 4.0);

        snap.restore(&mut tl);
        assert_eq!(tl.events()[1].reaction_time, 4.0);
    }

    #[test]
    fn restore_does_not_alias_snapshot() {
        let mut tl = make_timeline();
        let snap = TimelineSnapshot::capture(&tl);
        snap.restore(&mut tl);
        tl.remove_event(2).unwrap();
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn from_slice_copies_events() {
        let tl = make_timeline();
        let snap = TimelineSnapshot::from(tl.events());
        assert_eq!(snap, TimelineSnapshot::capture(&tl));
        assert!(!snap.is_empty());
    }
}
