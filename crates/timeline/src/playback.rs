//! Reference-player following: what the reference video should be doing at a
//! given reaction time, and which commands bring a player back in line.

use rx_common::TimeCode;
use tracing::debug;

use crate::types::{EventKind, SyncEvent};

/// Default drift allowed before the follower issues a seek.
pub const DEFAULT_SYNC_TOLERANCE_SECS: f64 = 0.5;

/// Expected reference state at a reaction time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ReferenceCue {
    /// No PLAY has happened yet.
    NotStarted,
    Playing { reference_time: f64 },
    Paused { reference_time: f64 },
}

/// Resolve the reference state at `reaction_time` from a sorted event list.
///
/// Uses the last PLAY/PAUSE at or before the time. A PLAY extrapolates
/// forward from its recorded reference time. An event missing its reference
/// time continues from the previous known position.
pub fn reference_cue_at(events: &[SyncEvent], reaction_time: f64) -> ReferenceCue {
    let mut cue = ReferenceCue::NotStarted;
    // (reaction time, reference time) of the PLAY currently in effect
    let mut playing_from: Option<(f64, f64)> = None;

    for event in events {
        if event.reaction_time > reaction_time {
            break;
        }
        match event.kind {
            EventKind::Play => {
                let base = event.reference_time.unwrap_or(match cue {
                    ReferenceCue::Paused { reference_time } => reference_time,
                    ReferenceCue::Playing { .. } | ReferenceCue::NotStarted => 0.0,
                });
                playing_from = Some((event.reaction_time, base));
                cue = ReferenceCue::Playing {
                    reference_time: base + (reaction_time - event.reaction_time),
                };
            }
            EventKind::Pause => {
                let fallback = match (cue, playing_from) {
                    (ReferenceCue::Playing { .. }, Some((from, base))) => {
                        base + (event.reaction_time - from)
                    }
                    (ReferenceCue::Paused { reference_time }, _) => reference_time,
                    _ => 0.0,
                };
                playing_from = None;
                cue = ReferenceCue::Paused {
                    reference_time: event.reference_time.unwrap_or(fallback),
                };
            }
            EventKind::Start | EventKind::End => {}
        }
    }
    cue
}

/// What the reference player is currently doing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerStatus {
    pub playing: bool,
    pub current_time: f64,
}

/// A correction for the reference player.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Seek(f64),
}

/// Keeps a reference player aligned with the recorded cues.
///
/// Meant to be polled periodically (around every 100ms) by the viewer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReferenceFollower {
    tolerance: f64,
}

impl Default for ReferenceFollower {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_TOLERANCE_SECS)
    }
}

impl ReferenceFollower {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Commands needed to move `status` to `cue`. Empty when already in sync.
    pub fn poll(&self, cue: ReferenceCue, status: PlayerStatus) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        match cue {
            ReferenceCue::NotStarted => {
                if status.playing {
                    commands.push(PlayerCommand::Pause);
                }
            }
            ReferenceCue::Playing { reference_time } => {
                if (status.current_time - reference_time).abs() > self.tolerance {
                    commands.push(PlayerCommand::Seek(reference_time));
                }
                if !status.playing {
                    commands.push(PlayerCommand::Play);
                }
            }
            ReferenceCue::Paused { reference_time } => {
                if status.playing {
                    commands.push(PlayerCommand::Pause);
                }
                if (status.current_time - reference_time).abs() > self.tolerance {
                    commands.push(PlayerCommand::Seek(reference_time));
                }
            }
        }
        if !commands.is_empty() {
            debug!(
                player_time = %TimeCode::from_secs(status.current_time),
                ?cue,
                ?commands,
                "Reference player correction"
            );
        }
        commands
    }
}
