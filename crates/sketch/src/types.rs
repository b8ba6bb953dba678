use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_SAMPLE_INTERVAL_MS;

pub use sketchpad_config::{DrawMode, Orientation, RedoPolicy, Viewport};

/// A single input sample: position in surface pixels plus the host's
/// monotonic timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    /// Milliseconds on the host's monotonic clock
    pub t: u64,
}

impl Sample {
    pub fn new(x: f32, y: f32, t: u64) -> Self {
        Self { x, y, t }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance between two samples
    #[inline]
    pub fn distance_to(&self, other: &Sample) -> f32 {
        self.position().distance(other.position())
    }

    /// Velocity in pixels per millisecond from `start` to `self`.
    ///
    /// Zero or negative intervals are clamped to [`MIN_SAMPLE_INTERVAL_MS`];
    /// a non-finite result is reported as 0.
    pub fn velocity_from(&self, start: &Sample) -> f32 {
        let interval = self.t.saturating_sub(start.t).max(MIN_SAMPLE_INTERVAL_MS);
        let velocity = self.distance_to(start) / interval as f32;
        if velocity.is_finite() { velocity } else { 0.0 }
    }

    /// Same position, ignoring time
    #[inline]
    pub fn same_position(&self, other: &Sample) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// One cubic Bézier piece of a smoothed stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CurveSegment {
    pub fn new(start: Vec2, control1: Vec2, control2: Vec2, end: Vec2) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }

    /// True when every coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.start.is_finite()
            && self.control1.is_finite()
            && self.control2.is_finite()
            && self.end.is_finite()
    }
}

/// A single draw step handed to the raster sink.
///
/// This struct is designed for GPU upload with bytemuck.
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct RasterStep {
    /// X position in surface coordinates
    pub x: f32,
    /// Y position in surface coordinates
    pub y: f32,
    /// Stroke width in pixels at this step
    pub width: f32,
}

/// All draw steps produced by one curve segment
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBatch {
    /// Paint or clear
    pub mode: DrawMode,
    /// Pen color as linear RGBA (ignored by sinks in erase mode)
    pub color: [f32; 4],
    /// Steps in curve parameter order
    pub steps: Vec<RasterStep>,
}

impl RasterBatch {
    /// Raw step data for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.steps)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_velocity() {
        let a = Sample::new(0.0, 0.0, 100);
        let b = Sample::new(30.0, 40.0, 110);
        assert!((b.distance_to(&a) - 50.0).abs() < 0.001);
        assert!((b.velocity_from(&a) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_sample_velocity_clamps_interval() {
        let a = Sample::new(0.0, 0.0, 100);
        let same_time = Sample::new(3.0, 4.0, 100);
        let backwards = Sample::new(3.0, 4.0, 50);

        // Both clamp to a 1ms interval
        assert!((same_time.velocity_from(&a) - 5.0).abs() < 0.001);
        assert!((backwards.velocity_from(&a) - 5.0).abs() < 0.001);

        let coincident = Sample::new(0.0, 0.0, 100);
        assert_eq!(coincident.velocity_from(&a), 0.0);
    }

    #[test]
    fn test_sample_velocity_non_finite_is_zero() {
        let a = Sample::new(f32::MAX, 0.0, 0);
        let b = Sample::new(-f32::MAX, 0.0, 1);
        assert_eq!(b.velocity_from(&a), 0.0);
    }

    #[test]
    fn test_raster_batch_bytes() {
        let batch = RasterBatch {
            mode: DrawMode::Draw,
            color: [0.0, 0.0, 0.0, 1.0],
            steps: vec![RasterStep::default(); 3],
        };
        assert_eq!(batch.as_bytes().len(), 3 * std::mem::size_of::<RasterStep>());
        assert_eq!(std::mem::size_of::<RasterStep>(), 12);
    }
}
