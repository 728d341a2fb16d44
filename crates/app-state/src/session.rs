//! The editing session: one explicit object owning everything a timeline
//! editor needs.
//!
//! `EditSession` holds the timeline, history, drag controller, zoom and
//! selection for one open timestamp file. The renderer feeds it typed
//! [`GestureEvent`]s and redraws in response to the returned
//! [`SessionEvent`]s.
//!
//! Lifecycle: [`EditSession::new`] → [`open`](EditSession::open) → edits →
//! [`close`](EditSession::close). Opening again replaces the previous
//! timeline and its history.

use std::time::{Duration, Instant};

use rx_common::{EditorConfig, TimeCode};
use rx_timeline::{
    PositionMapper, Segment, SyncEvent, TimelineModel, ZoomChange, ZoomController,
};
use tracing::{debug, info, warn};

use crate::drag::{DragController, DragMode, DragTarget};
use crate::error::SessionError;
use crate::gesture::{key_action, GestureEvent, KeyAction};
use crate::history::{HistoryManager, HistoryStatus};
use crate::selection::SelectionState;
use crate::snapshot::TimelineSnapshot;

/// Notifications for the renderer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Event times or membership changed; redraw points and segments.
    TimelineChanged,
    /// A short press on a point asked to preview from `time`.
    Preview { time: f64 },
    ZoomChanged(ZoomChange),
    HistoryChanged(HistoryStatus),
    SelectionChanged,
    DragStarted { target: DragTarget, mode: DragMode },
    DragCancelled,
    SyncModeChanged { enabled: bool },
}

/// A press on a point waiting to become either a click or a drag.
#[derive(Copy, Clone, Debug, PartialEq)]
struct PendingPress {
    index: usize,
    pointer_x: f64,
    /// A click toggles the point in the selection instead of replacing it.
    extend_selection: bool,
    /// `None` for events that cannot be dragged (START/END).
    drag_target: Option<DragTarget>,
    deadline: Instant,
}

/// An open editing session over one timeline.
#[derive(Debug)]
pub struct EditSession {
    config: EditorConfig,
    timeline: TimelineModel,
    history: HistoryManager,
    drag: DragController,
    zoom: ZoomController,
    selection: SelectionState,
    pending_press: Option<PendingPress>,
    is_open: bool,
    is_dirty: bool,
}

impl EditSession {
    /// Create a closed session configured by `config`.
    pub fn new(config: EditorConfig) -> Self {
        let mapper = PositionMapper::new(&config.timeline, config.zoom.initial);
        Self {
            timeline: TimelineModel::new(),
            history: HistoryManager::new(config.history.max_entries),
            drag: DragController::new(config.gesture.sync_mode),
            zoom: ZoomController::new(&config.zoom, mapper),
            selection: SelectionState::new(),
            pending_press: None,
            is_open: false,
            is_dirty: false,
            config,
        }
    }

    /// Load `events` as the session's timeline.
    ///
    /// Validation runs before anything is replaced: on error the previous
    /// timeline and history are untouched.
    pub fn open(&mut self, events: &[SyncEvent]) -> Result<Vec<SessionEvent>, SessionError> {
        let mut timeline = TimelineModel::new();
        timeline.load(events)?;

        self.drag.cancel(&mut self.timeline);
        self.pending_press = None;
        self.timeline = timeline;
        self.selection.clear();

        let snapshot = TimelineSnapshot::capture(&self.timeline);
        self.history.clear();
        self.history.set_original(snapshot.clone());
        self.history.push("Open", snapshot);

        self.is_open = true;
        self.is_dirty = false;
        let zoom = self.zoom.set_max_time(self.timeline.max_time());

        info!(
            events = self.timeline.len(),
            segments = self.timeline.segments().count(),
            "Session opened"
        );
        Ok(vec![
            SessionEvent::TimelineChanged,
            SessionEvent::ZoomChanged(zoom),
            SessionEvent::SelectionChanged,
            SessionEvent::HistoryChanged(self.history.status()),
        ])
    }

    /// Dispose of the timeline and its history.
    pub fn close(&mut self) {
        if !self.is_open {
            return;
        }
        self.drag.cancel(&mut self.timeline);
        self.pending_press = None;
        self.timeline = TimelineModel::new();
        self.history.clear();
        self.selection.clear();
        self.is_open = false;
        self.is_dirty = false;
        info!("Session closed");
    }

    // --- Discrete edits ---

    /// Insert an event and select it.
    pub fn add_event(&mut self, event: SyncEvent) -> Result<Vec<SessionEvent>, SessionError> {
        self.ensure_editable()?;
        let index = self.timeline.add_event(event)?;
        self.selection.select(index, false);
        Ok(self.commit("Add event"))
    }

    /// Remove one event. START and END are rejected.
    pub fn remove_event(&mut self, index: usize) -> Result<Vec<SessionEvent>, SessionError> {
        self.ensure_editable()?;
        self.timeline.remove_event(index)?;
        self.selection.clear();
        Ok(self.commit("Remove event"))
    }

    /// Remove every selected event as one undo step.
    ///
    /// All indices are checked first; if any is protected or stale nothing is removed.
    pub fn remove_selected(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        self.ensure_editable()?;
        if self.selection.is_empty() {
            return Err(SessionError::NothingSelected);
        }

        let mut indices = self.selection.selected().to_vec();
        indices.sort_unstable_by(|a, b| b.cmp(a));

        let mut staged = self.timeline.clone();
        for &index in &indices {
            staged.remove_event(index)?;
        }
        self.timeline = staged;
        debug!(count = indices.len(), "Selected events removed");

        self.selection.clear();
        Ok(self.commit("Remove events"))
    }

    /// Clone `segment` shifted by `offset_seconds` and select the copy.
    pub fn duplicate_segment(
        &mut self,
        segment: &Segment,
        offset_seconds: f64,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        self.ensure_editable()?;
        let (play, pause) = self.timeline.duplicate_segment(segment, offset_seconds)?;
        self.selection.select(play, false);
        self.selection.select(pause, true);
        Ok(self.commit("Duplicate segment"))
    }

    // --- History ---

    /// Step back one history entry. Ignored while dragging.
    pub fn undo(&mut self) -> Vec<SessionEvent> {
        if self.drag.is_dragging() {
            return Vec::new();
        }
        match self.history.undo() {
            Some(snapshot) => self.apply_snapshot(snapshot),
            None => Vec::new(),
        }
    }

    /// Step forward one history entry. Ignored while dragging.
    pub fn redo(&mut self) -> Vec<SessionEvent> {
        if self.drag.is_dragging() {
            return Vec::new();
        }
        match self.history.redo() {
            Some(snapshot) => self.apply_snapshot(snapshot),
            None => Vec::new(),
        }
    }

    /// Return to the timeline as it was opened. Undoable.
    pub fn reset(&mut self) -> Vec<SessionEvent> {
        if self.drag.is_dragging() || !self.history.can_reset() {
            return Vec::new();
        }
        match self.history.reset() {
            Some(snapshot) => self.apply_snapshot(snapshot),
            None => Vec::new(),
        }
    }

    // --- Zoom and modes ---

    pub fn zoom_in(&mut self) -> SessionEvent {
        SessionEvent::ZoomChanged(self.zoom.zoom_in())
    }

    pub fn zoom_out(&mut self) -> SessionEvent {
        SessionEvent::ZoomChanged(self.zoom.zoom_out())
    }

    pub fn set_zoom(&mut self, level: f64) -> SessionEvent {
        SessionEvent::ZoomChanged(self.zoom.set_zoom(level))
    }

    /// Applies from the next drag gesture on.
    pub fn set_sync_mode(&mut self, enabled: bool) -> SessionEvent {
        self.drag.set_sync_mode(enabled);
        debug!(enabled, "Sync mode set");
        SessionEvent::SyncModeChanged { enabled }
    }

    // --- Gestures ---

    /// Route one input event. `now` drives long-press detection.
    pub fn handle(&mut self, event: GestureEvent, now: Instant) -> Vec<SessionEvent> {
        if !self.is_open {
            return Vec::new();
        }
        match event {
            GestureEvent::PointerDown {
                x,
                target,
                modifiers,
                ..
            } => self.pointer_down(x, target, modifiers.extends_selection(), now),
            GestureEvent::PointerMove { x, .. } => self.pointer_move(x, now),
            GestureEvent::PointerUp => self.pointer_up(now),
            GestureEvent::PointerLeave => {
                self.pending_press = None;
                self.cancel_drag()
            }
            GestureEvent::KeyPress { code, modifiers } => match key_action(code, modifiers) {
                Some(action) => self.key(action),
                None => Vec::new(),
            },
        }
    }

    /// Promote a held press to a drag once the long-press delay has passed.
    ///
    /// Call from the UI's timer; [`handle`](Self::handle) also checks on moves.
    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        match self.pending_press.filter(|press| now >= press.deadline) {
            Some(press) => self.promote_press(press),
            None => Vec::new(),
        }
    }

    fn pointer_down(
        &mut self,
        x: f64,
        target: Option<DragTarget>,
        extend_selection: bool,
        now: Instant,
    ) -> Vec<SessionEvent> {
        if self.drag.is_dragging() {
            return Vec::new();
        }
        self.pending_press = None;

        match target {
            None => {
                if extend_selection || self.selection.is_empty() {
                    Vec::new()
                } else {
                    self.selection.clear();
                    vec![SessionEvent::SelectionChanged]
                }
            }
            Some(segment @ DragTarget::Segment { .. }) => self.start_drag(segment, x),
            Some(DragTarget::Point(index)) => {
                let Some(event) = self.timeline.get(index) else {
                    warn!(index, "Pointer down on unknown event");
                    return Vec::new();
                };
                // A long press drags the whole segment the point belongs to.
                let drag_target = if event.is_boundary() {
                    None
                } else {
                    Some(match self.timeline.segment_at(index) {
                        Some(seg) => DragTarget::Segment {
                            play_index: seg.play_index,
                            pause_index: seg.pause_index,
                        },
                        None => DragTarget::Point(index),
                    })
                };
                self.pending_press = Some(PendingPress {
                    index,
                    pointer_x: x,
                    extend_selection,
                    drag_target,
                    deadline: now + self.long_press(),
                });
                Vec::new()
            }
        }
    }

    fn pointer_move(&mut self, x: f64, now: Instant) -> Vec<SessionEvent> {
        let mut events = self.tick(now);
        let mapper = self.zoom.mapper();
        if self.drag.update(&mut self.timeline, x, &mapper).is_some() {
            events.push(SessionEvent::TimelineChanged);
        }
        events
    }

    fn pointer_up(&mut self, now: Instant) -> Vec<SessionEvent> {
        if self.drag.is_dragging() {
            return self.finish_drag();
        }

        let Some(press) = self.pending_press.take() else {
            return Vec::new();
        };
        if now >= press.deadline {
            // Held long enough but never moved: nothing to commit.
            return Vec::new();
        }

        let Some(event) = self.timeline.get(press.index) else {
            return Vec::new();
        };
        if press.extend_selection {
            self.selection.toggle(press.index);
            debug!(
                index = press.index,
                selected = self.selection.count(),
                "Selection toggled"
            );
            return vec![SessionEvent::SelectionChanged];
        }
        let time = event.reaction_time;
        self.selection.select(press.index, false);
        debug!(index = press.index, time = %TimeCode::from_secs(time), "Point clicked");
        vec![
            SessionEvent::SelectionChanged,
            SessionEvent::Preview { time },
        ]
    }

    fn key(&mut self, action: KeyAction) -> Vec<SessionEvent> {
        match action {
            KeyAction::Cancel => {
                if self.drag.is_dragging() {
                    self.cancel_drag()
                } else if !self.selection.is_empty() {
                    self.selection.clear();
                    vec![SessionEvent::SelectionChanged]
                } else {
                    Vec::new()
                }
            }
            KeyAction::Undo => self.undo(),
            KeyAction::Redo => self.redo(),
            KeyAction::DeleteSelection => self.remove_selected().unwrap_or_else(|e| {
                warn!(error = %e, "Delete rejected");
                Vec::new()
            }),
            KeyAction::ZoomIn => vec![self.zoom_in()],
            KeyAction::ZoomOut => vec![self.zoom_out()],
            KeyAction::ToggleSyncMode => {
                let enabled = !self.drag.sync_mode();
                vec![self.set_sync_mode(enabled)]
            }
        }
    }

    fn promote_press(&mut self, press: PendingPress) -> Vec<SessionEvent> {
        self.pending_press = None;
        match press.drag_target {
            Some(target) => self.start_drag(target, press.pointer_x),
            None => Vec::new(),
        }
    }

    fn start_drag(&mut self, target: DragTarget, x: f64) -> Vec<SessionEvent> {
        match self.drag.begin(&self.timeline, target, x) {
            Ok(mode) => {
                self.history.start_batch(match target {
                    DragTarget::Point(_) => "Move point",
                    DragTarget::Segment { .. } => "Move segment",
                });
                vec![SessionEvent::DragStarted { target, mode }]
            }
            Err(e) => {
                debug!(error = %e, ?target, "Drag not started");
                Vec::new()
            }
        }
    }

    fn finish_drag(&mut self) -> Vec<SessionEvent> {
        let Some(outcome) = self.drag.release(&mut self.timeline) else {
            return Vec::new();
        };
        if !outcome.changed {
            self.history.cancel_batch();
            return vec![SessionEvent::TimelineChanged];
        }

        self.history.end_batch(TimelineSnapshot::capture(&self.timeline));
        self.selection.clear();
        self.is_dirty = true;
        let zoom = self.zoom.set_max_time(self.timeline.max_time());
        vec![
            SessionEvent::TimelineChanged,
            SessionEvent::ZoomChanged(zoom),
            SessionEvent::SelectionChanged,
            SessionEvent::HistoryChanged(self.history.status()),
        ]
    }

    fn cancel_drag(&mut self) -> Vec<SessionEvent> {
        if !self.drag.cancel(&mut self.timeline) {
            return Vec::new();
        }
        self.history.cancel_batch();
        vec![SessionEvent::DragCancelled, SessionEvent::TimelineChanged]
    }

    fn apply_snapshot(&mut self, snapshot: TimelineSnapshot) -> Vec<SessionEvent> {
        snapshot.restore(&mut self.timeline);
        self.selection.clear();
        self.pending_press = None;
        self.is_dirty = true;
        let zoom = self.zoom.set_max_time(self.timeline.max_time());
        vec![
            SessionEvent::TimelineChanged,
            SessionEvent::ZoomChanged(zoom),
            SessionEvent::SelectionChanged,
            SessionEvent::HistoryChanged(self.history.status()),
        ]
    }

    /// Record the post-edit state as one history entry.
    ///
    /// Indices may have shifted, so a press waiting on a point is dropped.
    fn commit(&mut self, label: &str) -> Vec<SessionEvent> {
        self.pending_press = None;
        self.history.push(label, TimelineSnapshot::capture(&self.timeline));
        self.is_dirty = true;
        let zoom = self.zoom.set_max_time(self.timeline.max_time());
        vec![
            SessionEvent::TimelineChanged,
            SessionEvent::ZoomChanged(zoom),
            SessionEvent::SelectionChanged,
            SessionEvent::HistoryChanged(self.history.status()),
        ]
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        if !self.is_open {
            return Err(SessionError::NoSession);
        }
        if self.drag.is_dragging() {
            return Err(SessionError::DragInProgress);
        }
        Ok(())
    }

    fn long_press(&self) -> Duration {
        Duration::from_millis(self.config.gesture.long_press_ms)
    }

    // --- Accessors ---

    pub fn events(&self) -> &[SyncEvent] {
        self.timeline.events()
    }

    pub fn timeline(&self) -> &TimelineModel {
        &self.timeline
    }

    pub fn history_status(&self) -> HistoryStatus {
        self.history.status()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Mapper at the current zoom, for placing points and segments.
    pub fn mapper(&self) -> PositionMapper {
        self.zoom.mapper()
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn sync_mode(&self) -> bool {
        self.drag.sync_mode()
    }

    /// Whether there are edits since the last open or save.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn mark_saved(&mut self) {
        if self.is_dirty {
            self.is_dirty = false;
            debug!("Session marked as saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{KeyCode, Modifiers};
    use rx_timeline::EventKind;

    fn make_events() -> Vec<SyncEvent> {
        vec![
            SyncEvent::new(EventKind::Start, 0.0),
            SyncEvent::new(EventKind::Play, 10.0),
            SyncEvent::new(EventKind::Pause, 15.0),
            SyncEvent::new(EventKind::Play, 20.0),
            SyncEvent::new(EventKind::Pause, 25.0),
            SyncEvent::new(EventKind::End, 30.0),
        ]
    }

    fn make_session() -> EditSession {
        let mut session = EditSession::new(EditorConfig::default());
        session.open(&make_events()).unwrap();
        session
    }

    fn times(session: &EditSession) -> Vec<f64> {
        session.events().iter().map(|e| e.reaction_time).collect()
    }

    const FIRST_SEGMENT: DragTarget = DragTarget::Segment {
        play_index: 1,
        pause_index: 2,
    };

    fn down(x: f64, target: DragTarget) -> GestureEvent {
        GestureEvent::press(x, Some(target))
    }

    fn shift_down(target: DragTarget) -> GestureEvent {
        GestureEvent::PointerDown {
            x: 0.0,
            y: 0.0,
            target: Some(target),
            modifiers: Modifiers::SHIFT,
        }
    }

    fn click(session: &mut EditSession, event: GestureEvent, now: Instant) -> Vec<SessionEvent> {
        session.handle(event, now);
        session.handle(GestureEvent::PointerUp, now)
    }

    fn mv(x: f64) -> GestureEvent {
        GestureEvent::PointerMove { x, y: 0.0 }
    }

    #[test]
    fn closed_session_ignores_input_and_rejects_edits() {
        let mut session = EditSession::new(EditorConfig::default());
        assert!(session
            .handle(GestureEvent::PointerUp, Instant::now())
            .is_empty());
        assert_eq!(
            session.add_event(SyncEvent::new(EventKind::Play, 1.0)),
            Err(SessionError::NoSession)
        );
    }

    #[test]
    fn open_rejects_invalid_data_and_keeps_previous_timeline() {
        let mut session = make_session();
        let err = session
            .open(&[SyncEvent::new(EventKind::Play, -1.0)])
            .unwrap_err();
        assert!(matches!(err, SessionError::Timeline(_)));
        assert_eq!(session.events().len(), 6);
        assert!(!session.history_status().can_undo);
    }

    #[test]
    fn segment_drag_commits_one_history_entry() {
        let mut session = make_session();
        let now = Instant::now();

        let started = session.handle(down(500.0, FIRST_SEGMENT), now);
        assert!(matches!(started[0], SessionEvent::DragStarted { .. }));
        for x in [520.0, 600.0, 700.0, 750.0] {
            session.handle(mv(x), now);
        }
        session.handle(GestureEvent::PointerUp, now);

        assert_eq!(times(&session), vec![0.0, 15.0, 20.0, 20.0, 25.0, 30.0]);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().undo_label(), Some("Move segment"));
        assert!(session.is_dirty());

        session.undo();
        assert_eq!(times(&session), vec![0.0, 10.0, 15.0, 20.0, 25.0, 30.0]);
        session.redo();
        assert_eq!(times(&session), vec![0.0, 15.0, 20.0, 20.0, 25.0, 30.0]);
    }

    #[test]
    fn sync_mode_drag_ripples() {
        let mut session = make_session();
        let now = Instant::now();
        session.handle(GestureEvent::key(KeyCode::Char('s')), now);
        assert!(session.sync_mode());

        session.handle(down(0.0, FIRST_SEGMENT), now);
        session.handle(mv(250.0), now);
        session.handle(GestureEvent::PointerUp, now);
        assert_eq!(times(&session), vec![0.0, 15.0, 20.0, 25.0, 30.0, 30.0]);
    }

    #[test]
    fn escape_cancels_drag_without_history() {
        let mut session = make_session();
        let now = Instant::now();
        session.handle(down(0.0, FIRST_SEGMENT), now);
        session.handle(mv(300.0), now);
        let events = session.handle(GestureEvent::key(KeyCode::Escape), now);

        assert!(events.contains(&SessionEvent::DragCancelled));
        assert_eq!(times(&session), vec![0.0, 10.0, 15.0, 20.0, 25.0, 30.0]);
        assert_eq!(session.history().len(), 1);
        assert!(!session.history().is_batching());
        assert!(!session.is_dragging());
    }

    #[test]
    fn pointer_leave_cancels_drag() {
        let mut session = make_session();
        let now = Instant::now();
        session.handle(down(0.0, FIRST_SEGMENT), now);
        session.handle(mv(300.0), now);
        session.handle(GestureEvent::PointerLeave, now);
        assert_eq!(times(&session), vec![0.0, 10.0, 15.0, 20.0, 25.0, 30.0]);
    }

    #[test]
    fn short_press_on_point_selects_and_previews() {
        let mut session = make_session();
        let now = Instant::now();
        session.handle(down(1000.0, DragTarget::Point(3)), now);
        let events = session.handle(GestureEvent::PointerUp, now + Duration::from_millis(100));

        assert!(events.contains(&SessionEvent::Preview { time: 20.0 }));
        assert_eq!(session.selection().selected(), &[3]);
        assert!(!session.is_dragging());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn long_press_on_point_drags_its_segment() {
        let mut session = make_session();
        let now = Instant::now();
        session.handle(down(750.0, DragTarget::Point(2)), now);
        assert!(!session.is_dragging());

        let later = now + Duration::from_millis(600);
        let events = session.tick(later);
        assert_eq!(
            events,
            vec![SessionEvent::DragStarted {
                target: FIRST_SEGMENT,
                mode: DragMode::Individual
            }]
        );

        session.handle(mv(850.0), later);
        session.handle(GestureEvent::PointerUp, later);
        assert_eq!(times(&session), vec![0.0, 12.0, 17.0, 20.0, 25.0, 30.0]);
    }

    #[test]
    fn long_press_promoted_by_move() {
        let mut session = make_session();
        let now = Instant::now();
        session.handle(down(0.0, DragTarget::Point(1)), now);
        // Moving before the deadline does not drag.
        session.handle(mv(100.0), now + Duration::from_millis(100));
        assert!(!session.is_dragging());

        session.handle(mv(100.0), now + Duration::from_millis(700));
        assert!(session.is_dragging());
        session.handle(GestureEvent::PointerUp, now + Duration::from_millis(800));
        assert_eq!(times(&session)[1], 12.0);
    }

    #[test]
    fn boundary_point_previews_but_never_drags() {
        let mut session = make_session();
        let now = Instant::now();
        session.handle(down(0.0, DragTarget::Point(0)), now);
        assert!(session.tick(now + Duration::from_secs(1)).is_empty());
        assert!(!session.is_dragging());
    }

    #[test]
    fn protected_events_cannot_be_removed() {
        let mut session = make_session();
        assert!(matches!(
            session.remove_event(5),
            Err(SessionError::Timeline(_))
        ));
        assert_eq!(session.events().len(), 6);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn delete_key_removes_selection_atomically() {
        let mut session = make_session();
        let now = Instant::now();
        session.handle(down(0.0, DragTarget::Point(3)), now);
        session.handle(GestureEvent::PointerUp, now);
        session.handle(GestureEvent::key(KeyCode::Delete), now);
        assert_eq!(session.events().len(), 5);

        // A selection including END is rejected as a whole.
        session.handle(down(0.0, DragTarget::Point(4)), now);
        session.handle(GestureEvent::PointerUp, now);
        let events = session.handle(GestureEvent::key(KeyCode::Backspace), now);
        assert!(events.is_empty());
        assert_eq!(session.events().len(), 5);
    }

    #[test]
    fn edit_drops_pending_press() {
        let mut session = make_session();
        let now = Instant::now();
        // Removing PAUSE@15 shifts the pressed PLAY@20 down one index.
        session.handle(down(1000.0, DragTarget::Point(3)), now);
        session.remove_event(2).unwrap();

        assert!(session.handle(GestureEvent::PointerUp, now).is_empty());
        assert!(session.selection().is_empty());

        session.handle(down(1000.0, DragTarget::Point(3)), now);
        session.add_event(SyncEvent::new(EventKind::Play, 5.0)).unwrap();
        assert!(session.tick(now + Duration::from_secs(1)).is_empty());
        assert!(!session.is_dragging());
    }

    #[test]
    fn modifier_click_builds_multi_selection() {
        let mut session = make_session();
        let now = Instant::now();

        click(&mut session, down(0.0, DragTarget::Point(1)), now);
        let events = click(&mut session, shift_down(DragTarget::Point(3)), now);
        assert_eq!(events, vec![SessionEvent::SelectionChanged]);
        assert_eq!(session.selection().selected(), &[1, 3]);
        assert!(session.selection().is_multi_select());

        // Toggling again removes it.
        click(&mut session, shift_down(DragTarget::Point(3)), now);
        assert_eq!(session.selection().selected(), &[1]);

        // Modifier press on empty space keeps the selection.
        session.handle(
            GestureEvent::PointerDown {
                x: 0.0,
                y: 0.0,
                target: None,
                modifiers: Modifiers::SHIFT,
            },
            now,
        );
        assert_eq!(session.selection().selected(), &[1]);
    }

    #[test]
    fn deleting_multi_selection_is_one_undo_step() {
        let mut session = make_session();
        let now = Instant::now();
        click(&mut session, down(0.0, DragTarget::Point(1)), now);
        click(&mut session, shift_down(DragTarget::Point(4)), now);

        let events = session.handle(GestureEvent::key(KeyCode::Delete), now);
        assert!(events.contains(&SessionEvent::TimelineChanged));
        assert_eq!(times(&session), vec![0.0, 15.0, 20.0, 30.0]);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().undo_label(), Some("Remove events"));

        session.undo();
        assert_eq!(session.events(), make_events().as_slice());
    }

    #[test]
    fn multi_selection_with_end_is_rejected_whole() {
        let mut session = make_session();
        let now = Instant::now();
        click(&mut session, down(0.0, DragTarget::Point(2)), now);
        click(&mut session, shift_down(DragTarget::Point(5)), now);
        assert_eq!(session.selection().count(), 2);

        assert!(matches!(
            session.remove_selected(),
            Err(SessionError::Timeline(_))
        ));
        assert_eq!(session.events(), make_events().as_slice());
        assert_eq!(session.history().len(), 1);
        assert!(!session.is_dirty());
    }

    #[test]
    fn add_past_end_publishes_new_width() {
        let mut session = make_session();
        let events = session
            .add_event(SyncEvent::new(EventKind::Play, 40.0))
            .unwrap();

        // 40s * 50px
        let zoom = events.iter().find_map(|e| match e {
            SessionEvent::ZoomChanged(change) => Some(*change),
            _ => None,
        });
        assert_eq!(zoom.map(|z| z.timeline_width), Some(2000.0));
        assert!(events.contains(&SessionEvent::HistoryChanged(session.history_status())));
        assert_eq!(session.selection().selected(), &[6]);
    }

    #[test]
    fn duplicate_selects_the_copy() {
        let mut session = make_session();
        let segment = session.timeline().segments().next().unwrap();
        session.duplicate_segment(&segment, 2.0).unwrap();
        // [0, 10, 12, 15, 17, 20, 25, 30]
        assert_eq!(session.selection().selected(), &[2, 4]);
    }

    #[test]
    fn keyboard_undo_redo() {
        let mut session = make_session();
        session.remove_event(3).unwrap();
        let now = Instant::now();

        session.handle(
            GestureEvent::KeyPress {
                code: KeyCode::Char('z'),
                modifiers: Modifiers::CTRL,
            },
            now,
        );
        assert_eq!(session.events().len(), 6);

        session.handle(
            GestureEvent::KeyPress {
                code: KeyCode::Char('y'),
                modifiers: Modifiers::CTRL,
            },
            now,
        );
        assert_eq!(session.events().len(), 5);
    }

    #[test]
    fn duplicate_and_reset() {
        let mut session = make_session();
        let segment = session.timeline().segments().next().unwrap();
        session.duplicate_segment(&segment, 2.0).unwrap();
        assert_eq!(session.events().len(), 8);
        assert!(session.history_status().can_reset);

        session.reset();
        assert_eq!(session.events(), make_events().as_slice());
        assert!(!session.history_status().can_reset);

        session.undo();
        assert_eq!(session.events().len(), 8);
    }

    #[test]
    fn edits_rejected_while_dragging() {
        let mut session = make_session();
        session.handle(down(0.0, FIRST_SEGMENT), Instant::now());
        assert_eq!(
            session.add_event(SyncEvent::new(EventKind::Play, 1.0)),
            Err(SessionError::DragInProgress)
        );
        assert!(session.undo().is_empty());
    }

    #[test]
    fn zoom_keys_publish_width() {
        let mut session = make_session();
        let events = session.handle(GestureEvent::key(KeyCode::Char('+')), Instant::now());
        let SessionEvent::ZoomChanged(change) = events[0] else {
            panic!("expected zoom change, got {events:?}");
        };
        assert!((change.level - 1.2).abs() < 1e-12);
        // 30s * 50px * 1.2
        assert!((change.timeline_width - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn drag_uses_zoomed_scale() {
        let mut session = make_session();
        session.set_zoom(2.0);
        let now = Instant::now();
        session.handle(down(0.0, FIRST_SEGMENT), now);
        // 200px at 100px/s = 2s
        session.handle(mv(200.0), now);
        session.handle(GestureEvent::PointerUp, now);
        assert_eq!(times(&session)[1], 12.0);
    }

    #[test]
    fn close_disposes_state() {
        let mut session = make_session();
        session.remove_event(1).unwrap();
        session.close();
        assert!(!session.is_open());
        assert!(session.events().is_empty());
        assert!(session.history().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn mark_saved_clears_dirty() {
        let mut session = make_session();
        session.add_event(SyncEvent::new(EventKind::Play, 27.0)).unwrap();
        assert!(session.is_dirty());
        session.mark_saved();
        assert!(!session.is_dirty());
    }
}
