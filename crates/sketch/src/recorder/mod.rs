//! Live stroke recorder: turns a stream of samples into smoothed segments.
//!
//! The recorder is a two-state machine (idle, active). While active it keeps
//! a four-sample window; every sample that fills the window produces exactly
//! one curve segment, which is expanded into draw steps for the raster sink
//! and appended to the SVG output. Widths are path dependent, so segments are
//! emitted strictly in input order.

mod window;

pub use window::PointWindow;

use sketchpad_config::{PenParams, SketchConfig};
use tracing::{debug, trace};

use crate::curve;
use crate::history::Trail;
use crate::raster::{self, NullSink, RasterSink};
use crate::svg::SvgBuilder;
use crate::types::{CurveSegment, DrawMode, RasterBatch, Sample, Viewport};
use crate::width::{self, StrokeWidthState};

/// Error type for stroke recording operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecorderError {
    #[error("Stroke not started - call begin() first")]
    NotStarted,
    #[error("Stroke already started - call end() or cancel() first")]
    AlreadyStarted,
}

/// Per-stroke settings handed to [`StrokeRecorder::begin`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSetup {
    pub mode: DrawMode,
    pub color: [f32; 4],
    pub viewport: Viewport,
    /// Width settings the stroke is drawn with
    pub pen: PenParams,
    /// Smoothing state the stroke starts from
    pub width_state: StrokeWidthState,
}

impl StrokeSetup {
    /// Settings for a fresh stroke under `config`
    pub fn from_config(config: &SketchConfig, viewport: Viewport) -> Self {
        let pen = config.pen();
        Self {
            mode: config.mode,
            color: config.pen_color,
            viewport,
            pen,
            width_state: StrokeWidthState::new(&pen),
        }
    }

    /// Settings to replay `trail` exactly as it was captured
    pub fn for_trail(trail: &Trail) -> Self {
        let pen = trail.pen();
        Self {
            mode: trail.mode(),
            color: trail.color(),
            viewport: trail.viewport(),
            pen,
            width_state: StrokeWidthState::new(&pen),
        }
    }
}

/// What one filled window produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOutput {
    pub curve: CurveSegment,
    pub start_width: f32,
    pub end_width: f32,
    /// Filtered velocity used for `end_width`
    pub velocity: f32,
    /// Draw steps sent to the sink
    pub steps: usize,
}

#[derive(Debug, Clone)]
struct ActiveStroke {
    setup: StrokeSetup,
    width_state: StrokeWidthState,
    samples: Vec<Sample>,
}

/// Stroke recorder owning the raster sink and the SVG output it feeds.
#[derive(Debug)]
pub struct StrokeRecorder<S: RasterSink = NullSink> {
    config: SketchConfig,
    /// Current stroke (None while idle)
    active: Option<ActiveStroke>,
    window: PointWindow,
    svg: SvgBuilder,
    sink: S,
    /// Segments produced since the outputs were last reset
    segment_count: usize,
}

impl StrokeRecorder<NullSink> {
    /// Recorder with vector output only
    pub fn vector_only(config: SketchConfig) -> Self {
        Self::new(config, NullSink)
    }
}

impl<S: RasterSink> StrokeRecorder<S> {
    /// Create a recorder drawing into `sink`
    pub fn new(config: SketchConfig, sink: S) -> Self {
        let mut svg = SvgBuilder::new();
        svg.set_stroke_color(config.pen_color);
        Self {
            config,
            active: None,
            window: PointWindow::new(),
            svg,
            sink,
            segment_count: 0,
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Replace the configuration; widths apply from the next stroke on
    pub fn set_config(&mut self, config: SketchConfig) {
        self.svg.set_stroke_color(config.pen_color);
        self.config = config;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Samples captured so far in the active stroke
    pub fn active_sample_count(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.samples.len())
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn svg(&self) -> &SvgBuilder {
        &self.svg
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Split into the accumulated outputs
    pub fn into_outputs(self) -> (SvgBuilder, S) {
        (self.svg, self.sink)
    }

    /// Start a stroke at `sample`.
    ///
    /// The first sample is pushed twice so the first segment is produced
    /// after two more samples instead of three.
    pub fn begin(&mut self, sample: Sample, setup: StrokeSetup) -> Result<(), RecorderError> {
        if self.active.is_some() {
            return Err(RecorderError::AlreadyStarted);
        }

        self.window.clear();
        self.window.push(sample);
        self.window.push(sample);

        self.active = Some(ActiveStroke {
            setup,
            width_state: setup.width_state,
            samples: vec![sample],
        });

        debug!(
            "StrokeRecorder::begin: ({:.1}, {:.1}) t={} mode={:?}",
            sample.x, sample.y, sample.t, setup.mode
        );
        Ok(())
    }

    /// Add a sample to the active stroke, returning the segment it completed
    pub fn feed(&mut self, sample: Sample) -> Result<Option<SegmentOutput>, RecorderError> {
        let active = self.active.as_mut().ok_or(RecorderError::NotStarted)?;
        active.samples.push(sample);
        Ok(self.push_sample(sample))
    }

    /// Feed the final sample and return the finished trail
    pub fn end(&mut self, sample: Sample) -> Result<Trail, RecorderError> {
        self.feed(sample)?;
        let active = self.active.take().ok_or(RecorderError::NotStarted)?;
        self.window.clear();

        debug!(
            "StrokeRecorder::end: {} samples, mode={:?}",
            active.samples.len(),
            active.setup.mode
        );

        Ok(Trail::new(
            active.samples,
            active.setup.mode,
            active.setup.color,
            active.setup.viewport,
            active.setup.pen,
        ))
    }

    /// Abandon the active stroke without producing a trail.
    ///
    /// Output already emitted for the stroke stays in the sink and SVG.
    pub fn cancel(&mut self) -> Result<(), RecorderError> {
        let active = self.active.take().ok_or(RecorderError::NotStarted)?;
        self.window.clear();
        debug!(
            "StrokeRecorder::cancel: dropped {} samples",
            active.samples.len()
        );
        Ok(())
    }

    /// Clear both outputs (the active stroke, if any, continues)
    pub fn reset_output(&mut self) {
        self.svg.clear();
        self.sink.reset();
        self.segment_count = 0;
    }

    /// Install vector output rebuilt elsewhere (e.g. by a replay)
    pub fn replace_svg(&mut self, mut svg: SvgBuilder, segment_count: usize) {
        svg.set_stroke_color(self.config.pen_color);
        self.svg = svg;
        self.segment_count = segment_count;
    }

    fn push_sample(&mut self, sample: Sample) -> Option<SegmentOutput> {
        self.window.push(sample);
        let [p0, p1, p2, p3] = *self.window.full()?;
        let active = self.active.as_mut()?;

        let curve = curve::fit(&p0, &p1, &p2, &p3);
        let raw_velocity = p2.velocity_from(&p1);

        let start_width = active.width_state.last_width;
        let pen = active.setup.pen;
        let (end_width, next_state) = width::next(raw_velocity, active.width_state, &pen);
        active.width_state = next_state;

        let mode = active.setup.mode;
        let steps = raster::expand(&curve, start_width, end_width, mode, &pen);
        let step_count = steps.len();
        if !steps.is_empty() {
            self.sink.draw(&RasterBatch {
                mode,
                color: active.setup.color,
                steps,
            });
        }

        // Plain paths cannot remove paint, so erase segments stay raster-only
        if mode == DrawMode::Draw {
            self.svg.append(&curve, (start_width + end_width) / 2.0);
        }

        self.window.evict_oldest();
        self.segment_count += 1;

        trace!(
            "segment {}: width {:.2} -> {:.2}, velocity {:.3}, {} steps",
            self.segment_count, start_width, end_width, next_state.last_velocity, step_count
        );

        Some(SegmentOutput {
            curve,
            start_width,
            end_width,
            velocity: next_state.last_velocity,
            steps: step_count,
        })
    }
}
