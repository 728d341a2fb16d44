//! Timestamp file types: the JSON document that carries a reaction timeline.
//!
//! Field names match the files written by the recorder and the web viewer.
//! Sync points and the layout are kept as the JSON objects they were read
//! from, so an unedited file is written back value for value: integer times
//! stay integers, absent keys stay absent and unknown keys survive. Typed
//! accessors validate on the way out.

use rx_common::LayoutDefaults;
use rx_timeline::{validate_committable, EventKind, SyncEvent, TimelineError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

const REACTION_TIME: &str = "reaction_time";
const YOUTUBE_TIME: &str = "youtube_time";
const RELATIVE_YOUTUBE_TIME: &str = "relative_youtube_time";
const EVENT: &str = "event";
const YOUTUBE_FIRST_PLAY_TIME: &str = "youtube_first_play_time";

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// Top-level timestamp file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimestampFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_video_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_title: Option<String>,

    /// File name or URL of the reaction recording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_video: Option<String>,

    /// ISO-8601 UTC creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Raw layout object; read it through [`layout`](Self::layout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layout: Option<Map<String, Value>>,

    pub sync_points: Vec<SyncPointRecord>,

    /// Top-level keys this crate does not know about, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimestampFile {
    /// Create an empty file for `youtube_video_id`, stamped with the current time.
    pub fn new(youtube_video_id: impl Into<String>, reaction_video: impl Into<String>) -> Self {
        Self {
            youtube_video_id: Some(youtube_video_id.into()),
            reaction_video: Some(reaction_video.into()),
            created_at: Some(utc_now_iso()),
            ..Self::default()
        }
    }

    pub fn with_layout(mut self, layout: &LayoutSettings) -> Self {
        self.set_layout(layout);
        self
    }

    /// The stored layout, with missing keys filled from the defaults.
    pub fn layout(&self) -> Result<Option<LayoutSettings>, serde_json::Error> {
        self.layout
            .as_ref()
            .map(|map| serde_json::from_value(Value::Object(map.clone())))
            .transpose()
    }

    /// Replace the layout. Keys this crate does not know are kept.
    pub fn set_layout(&mut self, layout: &LayoutSettings) {
        let map = self.layout.get_or_insert_with(Map::new);
        map.insert(
            "overlay_position".into(),
            Value::String(layout.overlay_position.clone()),
        );
        map.insert("overlay_size".into(), number_value(layout.overlay_size));
        map.insert("youtube_volume".into(), number_value(layout.youtube_volume));
        map.insert("hide_overlay".into(), Value::Bool(layout.hide_overlay));
    }

    /// Layout to apply, falling back to `defaults` when the file has none
    /// or it cannot be read.
    pub fn layout_or(&self, defaults: &LayoutDefaults) -> LayoutSettings {
        match self.layout() {
            Ok(Some(layout)) => layout,
            _ => LayoutSettings::from(defaults),
        }
    }

    /// Convert every record to a [`SyncEvent`].
    ///
    /// Fails on the first malformed record; nothing is returned partially.
    pub fn events(&self) -> Result<Vec<SyncEvent>, TimelineError> {
        self.sync_points
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_event(index))
            .collect()
    }

    /// Replace the sync points with `events`.
    ///
    /// The events must be committable: every complete segment needs a
    /// positive duration. On error the file is unchanged. An event identical
    /// to one already stored reuses that record as-is.
    pub fn set_events(&mut self, events: &[SyncEvent]) -> Result<(), TimelineError> {
        validate_committable(events)?;

        let mut previous: Vec<Option<(SyncEvent, SyncPointRecord)>> = self
            .sync_points
            .drain(..)
            .enumerate()
            .map(|(index, record)| record.to_event(index).ok().map(|event| (event, record)))
            .collect();

        self.sync_points = events
            .iter()
            .map(|event| {
                previous
                    .iter_mut()
                    .find(|slot| matches!(slot, Some((stored, _)) if stored == event))
                    .and_then(Option::take)
                    .map(|(_, record)| record)
                    .unwrap_or_else(|| SyncPointRecord::from(event))
            })
            .collect();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Overlay layout chosen for playback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub overlay_position: String,
    pub overlay_size: f64,
    pub youtube_volume: f64,
    pub hide_overlay: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self::from(&LayoutDefaults::default())
    }
}

impl From<&LayoutDefaults> for LayoutSettings {
    fn from(defaults: &LayoutDefaults) -> Self {
        Self {
            overlay_position: defaults.overlay_position.clone(),
            overlay_size: defaults.overlay_size,
            youtube_volume: defaults.youtube_volume,
            hide_overlay: defaults.hide_overlay,
        }
    }
}

// ---------------------------------------------------------------------------
// Sync points
// ---------------------------------------------------------------------------

/// One sync point as stored on disk.
///
/// Records built from a [`SyncEvent`] write every nullable key, as `null`
/// when absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncPointRecord(Map<String, Value>);

impl SyncPointRecord {
    pub fn reaction_time(&self) -> Option<f64> {
        self.number(REACTION_TIME).ok().flatten()
    }

    pub fn event(&self) -> Option<&str> {
        self.0.get(EVENT).and_then(Value::as_str)
    }

    /// Raw value of any key, including ones this crate does not interpret.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Validate and convert. `index` is reported in errors.
    pub fn to_event(&self, index: usize) -> Result<SyncEvent, TimelineError> {
        let invalid = |reason: String| TimelineError::InvalidData { index, reason };

        let reaction_time = self
            .number(REACTION_TIME)
            .map_err(invalid)?
            .ok_or_else(|| invalid("missing reaction_time".into()))?;
        if reaction_time < 0.0 {
            return Err(invalid(format!("invalid reaction_time {reaction_time}")));
        }

        let kind: EventKind = match self.0.get(EVENT) {
            Some(Value::String(name)) => name.parse().map_err(invalid)?,
            Some(Value::Null) | None => return Err(invalid("missing event".into())),
            Some(other) => return Err(invalid(format!("event {other} is not a string"))),
        };

        Ok(SyncEvent {
            reaction_time,
            reference_time: self.number(YOUTUBE_TIME).map_err(invalid)?,
            relative_reference_time: self.number(RELATIVE_YOUTUBE_TIME).map_err(invalid)?,
            kind,
            reference_first_start_time: self.number(YOUTUBE_FIRST_PLAY_TIME).map_err(invalid)?,
        })
    }

    /// `None` for an absent or `null` key.
    fn number(&self, key: &str) -> Result<Option<f64>, String> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| format!("{key} {n} is out of range")),
            Some(other) => Err(format!("{key} {other} is not a number")),
        }
    }
}

impl From<&SyncEvent> for SyncPointRecord {
    fn from(event: &SyncEvent) -> Self {
        let optional = |v: Option<f64>| v.map_or(Value::Null, number_value);

        let mut map = Map::new();
        map.insert(REACTION_TIME.into(), number_value(event.reaction_time));
        map.insert(YOUTUBE_TIME.into(), optional(event.reference_time));
        map.insert(
            RELATIVE_YOUTUBE_TIME.into(),
            optional(event.relative_reference_time),
        );
        map.insert(EVENT.into(), Value::String(event.kind.as_str().into()));
        map.insert(
            YOUTUBE_FIRST_PLAY_TIME.into(),
            optional(event.reference_first_start_time),
        );
        Self(map)
    }
}

impl From<Map<String, Value>> for SyncPointRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// JSON number for `v`. Integral values are written in integer form, the way
/// the browser serializes them.
fn number_value(v: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
        Value::from(v as i64)
    } else {
        Number::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

fn utc_now_iso() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    iso_from_epoch(secs)
}

/// Format Unix seconds as `YYYY-MM-DDTHH:MM:SSZ`.
fn iso_from_epoch(epoch: u64) -> String {
    let (year, month, day) = civil_from_days(epoch / 86_400);
    let rem = epoch % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem / 60) % 60,
        rem % 60
    )
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    // Shift the epoch to 0000-03-01 so leap days fall at the end of a year.
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}
