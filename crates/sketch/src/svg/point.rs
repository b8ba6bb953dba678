//! Integer points as they appear in the SVG document.

use std::fmt;

use glam::Vec2;

/// A point rounded to whole pixels; decimals are not significant in the
/// exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SvgPoint {
    pub x: i32,
    pub y: i32,
}

impl SvgPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset from `origin` to `self`
    pub fn relative_to(&self, origin: SvgPoint) -> SvgPoint {
        SvgPoint {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl From<Vec2> for SvgPoint {
    /// Halves round up (toward positive infinity), so `-2.5` becomes `-2`
    fn from(point: Vec2) -> Self {
        Self {
            x: round_half_up(point.x),
            y: round_half_up(point.y),
        }
    }
}

#[inline]
fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

impl fmt::Display for SvgPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
