//! A completed stroke as captured, kept for replay.

use sketchpad_config::PenParams;

use crate::types::{DrawMode, Sample, Viewport};

/// Raw samples of one stroke plus the settings active while it was drawn.
///
/// Replay only reads these stored settings, never the board's current ones.
///
/// Trails are only produced by the recorder, which always stores the
/// begin and end samples, so a trail holds at least two samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    samples: Vec<Sample>,
    mode: DrawMode,
    color: [f32; 4],
    viewport: Viewport,
    pen: PenParams,
}

impl Trail {
    pub(crate) fn new(
        samples: Vec<Sample>,
        mode: DrawMode,
        color: [f32; 4],
        viewport: Viewport,
        pen: PenParams,
    ) -> Self {
        Self {
            samples,
            mode,
            color,
            viewport,
            pen,
        }
    }

    /// Samples in capture order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Viewport active during capture
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Width settings active during capture
    pub fn pen(&self) -> PenParams {
        self.pen
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// False for a tap: every sample sits where the stroke began
    pub fn has_movement(&self) -> bool {
        match self.samples.split_first() {
            Some((first, rest)) => rest.iter().any(|s| !s.same_position(first)),
            None => false,
        }
    }
}
