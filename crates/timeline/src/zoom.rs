//! Zoom level management.

use rx_common::ZoomConfig;
use tracing::debug;

use crate::position::PositionMapper;

/// Zoom level clamped to `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomState {
    pub level: f64,
    pub min: f64,
    pub max: f64,
}

impl ZoomState {
    fn clamp(&self, level: f64) -> f64 {
        level.clamp(self.min, self.max)
    }
}

/// Published after every zoom change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomChange {
    pub level: f64,
    pub timeline_width: f64,
}

/// Owns the zoom level and republishes the timeline width whenever it changes.
#[derive(Clone, Debug)]
pub struct ZoomController {
    state: ZoomState,
    step: f64,
    mapper: PositionMapper,
    max_time: f64,
    timeline_width: f64,
}

impl ZoomController {
    /// `mapper` supplies the base scale; its zoom level is replaced by the
    /// clamped `config.initial`.
    pub fn new(config: &ZoomConfig, mapper: PositionMapper) -> Self {
        let (min, max) = if config.min <= config.max {
            (config.min, config.max)
        } else {
            (config.max, config.min)
        };
        let state = ZoomState {
            level: config.initial.clamp(min, max),
            min,
            max,
        };
        let mapper = mapper.with_zoom(state.level);
        Self {
            state,
            step: config.step,
            mapper,
            max_time: 0.0,
            timeline_width: mapper.timeline_width(0.0),
        }
    }

    pub fn zoom_in(&mut self) -> ZoomChange {
        self.apply(self.state.level * self.step)
    }

    pub fn zoom_out(&mut self) -> ZoomChange {
        if self.step == 0.0 {
            return self.current();
        }
        self.apply(self.state.level / self.step)
    }

    /// Set the level directly (clamped).
    pub fn set_zoom(&mut self, level: f64) -> ZoomChange {
        self.apply(level)
    }

    /// Zoom to `level` keeping the time under `anchor_px` fixed on screen.
    ///
    /// `anchor_px` is relative to the viewport and `scroll_px` is the current
    /// horizontal scroll offset. Returns the new scroll offset.
    pub fn zoom_around(&mut self, level: f64, anchor_px: f64, scroll_px: f64) -> (ZoomChange, f64) {
        let anchor_time = self.mapper.time_at(scroll_px + anchor_px);
        let change = self.apply(level);
        let new_scroll = (self.mapper.segment_left(anchor_time) - anchor_px).max(0.0);
        (change, new_scroll)
    }

    /// Update the timeline length and recompute the width at the current zoom.
    pub fn set_max_time(&mut self, max_time: f64) -> ZoomChange {
        self.max_time = max_time.max(0.0);
        self.timeline_width = self.mapper.timeline_width(self.max_time);
        self.current()
    }

    pub fn level(&self) -> f64 {
        self.state.level
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    pub fn timeline_width(&self) -> f64 {
        self.timeline_width
    }

    /// Mapper at the current zoom level.
    pub fn mapper(&self) -> PositionMapper {
        self.mapper
    }

    fn current(&self) -> ZoomChange {
        ZoomChange {
            level: self.state.level,
            timeline_width: self.timeline_width,
        }
    }

    fn apply(&mut self, level: f64) -> ZoomChange {
        if !level.is_finite() {
            return self.current();
        }
        self.state.level = self.state.clamp(level);
        self.mapper = self.mapper.with_zoom(self.state.level);
        self.timeline_width = self.mapper.timeline_width(self.max_time);
        debug!(
            level = self.state.level,
            timeline_width = self.timeline_width,
            "Zoom changed"
        );
        self.current()
    }
}
