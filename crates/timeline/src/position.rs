//! Time ↔ pixel mapping for the timeline renderer.

use rx_common::TimelineConfig;

/// Converts between reaction time and horizontal pixel offsets.
///
/// A plain value: copy it freely, every method is a pure function of the
/// stored parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionMapper {
    pub pixels_per_second: f64,
    pub zoom_level: f64,
    pub point_radius: f64,
    pub min_segment_width: f64,
    pub min_canvas_width: f64,
}

impl PositionMapper {
    pub fn new(config: &TimelineConfig, zoom_level: f64) -> Self {
        Self {
            pixels_per_second: config.pixels_per_second,
            zoom_level,
            point_radius: config.point_radius,
            min_segment_width: config.min_segment_width,
            min_canvas_width: config.min_canvas_width,
        }
    }

    /// Same mapping at a different zoom level.
    pub fn with_zoom(self, zoom_level: f64) -> Self {
        Self { zoom_level, ..self }
    }

    /// Effective pixels per second after zoom.
    pub fn scale(&self) -> f64 {
        self.pixels_per_second * self.zoom_level
    }

    /// Left edge of a point marker centered on `time`.
    pub fn point_left(&self, time: f64) -> f64 {
        time * self.scale() - self.point_radius
    }

    pub fn segment_left(&self, start_time: f64) -> f64 {
        start_time * self.scale()
    }

    /// Segment width, never narrower than `min_segment_width`.
    pub fn segment_width(&self, duration: f64) -> f64 {
        (duration * self.scale()).max(self.min_segment_width)
    }

    /// Canvas width needed to show `max_time`, never narrower than `min_canvas_width`.
    pub fn timeline_width(&self, max_time: f64) -> f64 {
        (max_time * self.scale()).max(self.min_canvas_width)
    }

    /// Reaction time under a horizontal offset; inverse of [`segment_left`](Self::segment_left).
    pub fn time_at(&self, offset: f64) -> f64 {
        let scale = self.scale();
        if scale <= 0.0 {
            return 0.0;
        }
        (offset / scale).max(0.0)
    }

    /// Seconds represented by a pointer movement of `dx` pixels.
    pub fn delta_time(&self, dx: f64) -> f64 {
        let scale = self.scale();
        if scale <= 0.0 {
            return 0.0;
        }
        dx / scale
    }
}

impl Default for PositionMapper {
    fn default() -> Self {
        Self::new(&TimelineConfig::default(), 1.0)
    }
}
