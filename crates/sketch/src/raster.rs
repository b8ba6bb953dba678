//! Raster plan for curve segments
//!
//! The engine never touches pixels. Each segment is expanded into roughly
//! one draw step per pixel of curve length and handed to a [`RasterSink`]
//! owned by the host, which composites the steps onto its surface.

use sketchpad_config::PenParams;
use tracing::{trace, warn};

use crate::constants::MAX_SEGMENT_STEPS;
use crate::curve;
use crate::types::{CurveSegment, DrawMode, RasterBatch, RasterStep};

/// Receiver for draw steps (the host's compositor)
pub trait RasterSink {
    /// Composite one segment's steps
    fn draw(&mut self, batch: &RasterBatch);

    /// Drop everything drawn so far
    fn reset(&mut self);
}

/// Sink that keeps every batch in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    batches: Vec<RasterBatch>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> &[RasterBatch] {
        &self.batches
    }

    pub fn into_batches(self) -> Vec<RasterBatch> {
        self.batches
    }

    /// Total number of steps across all batches
    pub fn step_count(&self) -> usize {
        self.batches.iter().map(|b| b.steps.len()).sum()
    }
}

impl RasterSink for RecordingSink {
    fn draw(&mut self, batch: &RasterBatch) {
        self.batches.push(batch.clone());
    }

    fn reset(&mut self) {
        self.batches.clear();
    }
}

/// Sink that discards everything (vector output only)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RasterSink for NullSink {
    fn draw(&mut self, _batch: &RasterBatch) {}

    fn reset(&mut self) {}
}

/// Expand a segment into draw steps.
///
/// Step count is `floor(length(curve))`, capped at [`MAX_SEGMENT_STEPS`],
/// so very short segments produce no steps. In draw mode the width eases
/// from `start_width` to `end_width` with `t³`; in erase mode every step uses
/// the stroke's eraser width.
pub fn expand(
    curve: &CurveSegment,
    start_width: f32,
    end_width: f32,
    mode: DrawMode,
    pen: &PenParams,
) -> Vec<RasterStep> {
    let length = curve::length(curve);
    let mut step_count = length.floor() as usize;
    if step_count == 0 {
        return Vec::new();
    }
    if step_count > MAX_SEGMENT_STEPS {
        warn!(
            "expand: segment length {:.1} exceeds {} steps, clamping",
            length, MAX_SEGMENT_STEPS
        );
        step_count = MAX_SEGMENT_STEPS;
    }

    let width_delta = end_width - start_width;
    let mut steps = Vec::with_capacity(step_count);

    for i in 0..step_count {
        let t = i as f32 / step_count as f32;
        let position = curve::point_at(curve, t);
        let width = match mode {
            DrawMode::Draw => start_width + t * t * t * width_delta,
            DrawMode::Erase => pen.eraser_width,
        };
        steps.push(RasterStep {
            x: position.x,
            y: position.y,
            width,
        });
    }

    trace!(
        "expand: {} steps from ({:.1}, {:.1}) to ({:.1}, {:.1})",
        step_count, curve.start.x, curve.start.y, curve.end.x, curve.end.y
    );

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn line(length: f32) -> CurveSegment {
        CurveSegment::new(
            Vec2::ZERO,
            Vec2::new(length / 3.0, 0.0),
            Vec2::new(2.0 * length / 3.0, 0.0),
            Vec2::new(length, 0.0),
        )
    }

    #[test]
    fn test_expand_step_count() {
        let pen = PenParams::default();
        let steps = expand(&line(10.5), 3.0, 7.0, DrawMode::Draw, &pen);
        assert_eq!(steps.len(), 10);
        assert_eq!(steps[0].x, 0.0);
        assert_eq!(steps[0].width, 3.0);
    }

    #[test]
    fn test_expand_short_curve_is_empty() {
        let pen = PenParams::default();
        assert!(expand(&line(0.9), 3.0, 7.0, DrawMode::Draw, &pen).is_empty());
        assert!(expand(&line(0.0), 3.0, 7.0, DrawMode::Draw, &pen).is_empty());
    }

    #[test]
    fn test_expand_cubic_width_easing() {
        let pen = PenParams::default();
        let steps = expand(&line(4.5), 2.0, 10.0, DrawMode::Draw, &pen);
        assert_eq!(steps.len(), 4);
        // t = 0.5 -> 2 + 0.125 * 8
        assert!((steps[2].width - 3.0).abs() < 0.001);
        assert!((steps[2].x - 2.25).abs() < 0.001);
        for pair in steps.windows(2) {
            assert!(pair[1].width >= pair[0].width);
        }
    }

    #[test]
    fn test_expand_erase_uses_eraser_width() {
        let pen = PenParams {
            eraser_width: 25.0,
            ..Default::default()
        };
        let steps = expand(&line(20.0), 3.0, 7.0, DrawMode::Erase, &pen);
        assert!(!steps.is_empty());
        assert!(steps.iter().all(|s| s.width == 25.0));
    }

    #[test]
    fn test_expand_huge_segment_is_clamped() {
        let pen = PenParams::default();
        let steps = expand(&line(3e19), 3.0, 7.0, DrawMode::Draw, &pen);
        assert_eq!(steps.len(), MAX_SEGMENT_STEPS);
        assert!(steps.iter().all(|s| s.x.is_finite() && s.width.is_finite()));
        assert!(steps.windows(2).all(|pair| pair[1].x >= pair[0].x));
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        let batch = RasterBatch {
            mode: DrawMode::Draw,
            color: [0.0, 0.0, 0.0, 1.0],
            steps: vec![RasterStep::default(); 2],
        };
        sink.draw(&batch);
        sink.draw(&batch);
        assert_eq!(sink.batches().len(), 2);
        assert_eq!(sink.step_count(), 4);

        sink.reset();
        assert!(sink.batches().is_empty());
    }
}
