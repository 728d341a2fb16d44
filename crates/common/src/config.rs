//! Configuration structs for the timeline, zoom, history, and gesture handling.

use serde::{Deserialize, Serialize};

/// Top-level editor configuration.
///
/// Every section falls back to its defaults when absent, so a partial config
/// file only needs to name the values it overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub timeline: TimelineConfig,
    pub zoom: ZoomConfig,
    pub history: HistoryConfig,
    pub gesture: GestureConfig,
    pub layout: LayoutDefaults,
}

/// Time-to-pixel mapping parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Horizontal pixels per second of reaction time at zoom 1.0.
    pub pixels_per_second: f64,
    /// Radius of a point marker in pixels.
    pub point_radius: f64,
    /// Narrowest a segment is ever drawn, in pixels.
    pub min_segment_width: f64,
    /// Narrowest the whole timeline canvas is ever drawn, in pixels.
    pub min_canvas_width: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pixels_per_second: 50.0,
            point_radius: 6.0,
            min_segment_width: 10.0,
            min_canvas_width: 800.0,
        }
    }
}

/// Zoom range and step.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub initial: f64,
    pub min: f64,
    pub max: f64,
    /// Multiplier applied by one zoom-in step (divisor for zoom-out).
    pub step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            min: 0.1,
            max: 10.0,
            step: 1.2,
        }
    }
}

/// Undo/redo history settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept; the oldest is evicted first.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 50 }
    }
}

/// Pointer gesture settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// How long a point must be held before the press becomes a drag.
    pub long_press_ms: u64,
    /// Whether drags start in sync (ripple) mode.
    pub sync_mode: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            sync_mode: false,
        }
    }
}

/// Overlay layout written into new timestamp files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutDefaults {
    pub overlay_position: String,
    /// Overlay size as a percentage of the player width.
    pub overlay_size: f64,
    /// Reference player volume (0-100).
    pub youtube_volume: f64,
    pub hide_overlay: bool,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            overlay_position: "bottom-right".to_string(),
            overlay_size: 30.0,
            youtube_volume: 100.0,
            hide_overlay: false,
        }
    }
}
