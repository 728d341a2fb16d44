//! Core time type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Time code in seconds (f64 precision).
///
/// The model stores plain `f64` seconds; `TimeCode` is used where a value is
/// displayed or logged.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeCode(pub f64);

impl TimeCode {
    pub const ZERO: Self = Self(0.0);

    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    /// Clamp to the non-negative range.
    pub fn non_negative(self) -> Self {
        Self(self.0.max(0.0))
    }
}

impl Add for TimeCode {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TimeCode {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TimeCode {
    /// Formats as `MM:SS.mmm`, or `H:MM:SS.mmm` past the hour.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_millis = (self.0.max(0.0) * 1000.0).round() as u64;
        let millis = total_millis % 1000;
        let total_secs = total_millis / 1000;
        let secs = total_secs % 60;
        let mins = (total_secs / 60) % 60;
        let hours = total_secs / 3600;
        if hours > 0 {
            write!(f, "{hours}:{mins:02}:{secs:02}.{millis:03}")
        } else {
            write!(f, "{mins:02}:{secs:02}.{millis:03}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecode_display() {
        assert_eq!(TimeCode::from_secs(0.0).to_string(), "00:00.000");
        assert_eq!(TimeCode::from_secs(75.25).to_string(), "01:15.250");
        assert_eq!(TimeCode::from_secs(3725.5).to_string(), "1:02:05.500");
    }

    #[test]
    fn timecode_arithmetic() {
        let a = TimeCode::from_secs(10.0);
        let b = TimeCode::from_secs(4.0);
        assert_eq!((a - b).as_secs(), 6.0);
        assert_eq!((a + b).as_secs(), 14.0);
        assert_eq!((b - a).non_negative(), TimeCode::ZERO);
    }

    #[test]
    fn timecode_negative_displays_as_zero() {
        assert_eq!(TimeCode::from_secs(-3.0).to_string(), "00:00.000");
    }
}
