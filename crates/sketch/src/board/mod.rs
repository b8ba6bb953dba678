//! Per-canvas owner of the recorder, history and outputs.
//!
//! [`SketchBoard`] is the single point that mutates a canvas: live input goes
//! through the recorder, completed strokes land in history, and undo/redo
//! rebuild both outputs by replaying the remaining strokes. Rebuilds can run
//! synchronously ([`SketchBoard::undo`]) or be handed out as a
//! [`ReplayJob`] and installed later with [`SketchBoard::apply_replay`].

mod input;
mod replay;
mod shared;

pub use input::{InputEvent, Phase};
pub use replay::{ReplayError, ReplayJob, ReplayOutput, ReplayToken};
pub use shared::SharedSketchBoard;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sketchpad_config::SketchConfig;
use tracing::{debug, info, warn};

use crate::error::SketchError;
use crate::events::SketchEvent;
use crate::history::{HistoryManager, ReplayStats, Trail, replay_trail};
use crate::raster::{NullSink, RasterSink};
use crate::recorder::{RecorderError, SegmentOutput, StrokeRecorder, StrokeSetup};
use crate::types::{DrawMode, Sample, Viewport};

type EventListener = Box<dyn Fn(SketchEvent) + Send + Sync>;

/// A drawing surface with undoable stroke history.
pub struct SketchBoard<S: RasterSink = NullSink> {
    config: SketchConfig,
    viewport: Viewport,
    recorder: StrokeRecorder<S>,
    history: HistoryManager,
    /// Strokes kept after `clear_histories`; replayed first, never undone
    base_layer: Vec<Arc<Trail>>,
    listeners: Vec<EventListener>,
    /// Bumped whenever the outputs are rebuilt or live input starts
    generation: Arc<AtomicU64>,
    /// A prepared replay has not been applied yet
    pending_replay: bool,
    /// Segment count when the active stroke began
    stroke_first_segment: usize,
    /// No stroke is visible or in progress
    empty: bool,
    /// `empty` before the active stroke began
    empty_before_stroke: bool,
}

impl<S: RasterSink + std::fmt::Debug> std::fmt::Debug for SketchBoard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchBoard")
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("recorder", &self.recorder)
            .field("history", &self.history)
            .field("base_layer", &self.base_layer.len())
            .field("listener_count", &self.listeners.len())
            .field("generation", &self.generation())
            .field("pending_replay", &self.pending_replay)
            .field("empty", &self.empty)
            .finish()
    }
}

impl SketchBoard<NullSink> {
    /// Board producing vector output only
    pub fn vector_only(config: SketchConfig, viewport: Viewport) -> Result<Self, SketchError> {
        Self::new(config, viewport, NullSink)
    }
}

impl<S: RasterSink> SketchBoard<S> {
    /// Create a board drawing into `sink`; fails on an invalid config
    pub fn new(config: SketchConfig, viewport: Viewport, sink: S) -> Result<Self, SketchError> {
        config.validate()?;
        info!(
            "SketchBoard: {}x{} canvas, width {:.1}-{:.1}, {:?} redo",
            viewport.width, viewport.height, config.min_width, config.max_width, config.redo_policy
        );
        Ok(Self {
            history: HistoryManager::new(config.redo_policy),
            recorder: StrokeRecorder::new(config.clone(), sink),
            config,
            viewport,
            base_layer: Vec::new(),
            listeners: Vec::new(),
            generation: Arc::new(AtomicU64::new(0)),
            pending_replay: false,
            stroke_first_segment: 0,
            empty: true,
            empty_before_stroke: true,
        })
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn recorder(&self) -> &StrokeRecorder<S> {
        &self.recorder
    }

    pub fn sink(&self) -> &S {
        self.recorder.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.recorder.sink_mut()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn has_pending_replay(&self) -> bool {
        self.pending_replay
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// True when no stroke is visible or in progress
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Strokes kept by [`SketchBoard::clear_histories`], oldest first
    pub fn base_layer(&self) -> &[Arc<Trail>] {
        &self.base_layer
    }

    /// Everything a rebuild replays, oldest first
    fn replay_trails(&self) -> impl Iterator<Item = &Arc<Trail>> {
        self.base_layer
            .iter()
            .chain(self.history.active_trails().iter())
    }

    /// Register a listener; it receives every later event
    pub fn add_event_listener<F>(&mut self, listener: F)
    where
        F: Fn(SketchEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: SketchEvent) {
        for listener in &self.listeners {
            listener(event.clone());
        }
    }

    fn emit_history_changed(&self) {
        self.emit(SketchEvent::HistoryChanged {
            undo_count: self.history.undo_count(),
            redo_count: self.history.redo_count(),
        });
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn ensure_idle(&self) -> Result<(), SketchError> {
        if self.recorder.is_active() {
            return Err(RecorderError::AlreadyStarted.into());
        }
        Ok(())
    }

    /// Dispatch one host input event by phase
    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), SketchError> {
        match event.phase {
            Phase::Begin => self.begin(event.x, event.y, event.timestamp_ms),
            Phase::Move => self.move_to(event.x, event.y, event.timestamp_ms).map(|_| ()),
            Phase::End => self.end(event.x, event.y, event.timestamp_ms).map(|_| ()),
        }
    }

    /// Start a stroke with the current mode and pen color.
    ///
    /// Any prepared replay is superseded; if one was still pending the
    /// outputs are rebuilt first so the new stroke lands on current content.
    pub fn begin(&mut self, x: f32, y: f32, timestamp_ms: u64) -> Result<(), SketchError> {
        self.ensure_idle()?;

        if self.pending_replay {
            debug!("SketchBoard::begin: rebuilding before live input");
            self.rebuild()?;
        } else {
            self.bump_generation();
        }

        let sample = Sample::new(x, y, timestamp_ms);
        let setup = StrokeSetup::from_config(&self.config, self.viewport);
        self.recorder.begin(sample, setup)?;
        self.stroke_first_segment = self.recorder.segment_count();
        self.empty_before_stroke = self.empty;
        self.empty = false;

        self.emit(SketchEvent::StrokeStarted {
            x,
            y,
            timestamp_ms,
            mode: self.config.mode,
        });
        Ok(())
    }

    /// Continue the active stroke; returns the segment this sample completed
    pub fn move_to(
        &mut self,
        x: f32,
        y: f32,
        timestamp_ms: u64,
    ) -> Result<Option<SegmentOutput>, SketchError> {
        Ok(self.recorder.feed(Sample::new(x, y, timestamp_ms))?)
    }

    /// Finish the active stroke; returns whether it was recorded.
    ///
    /// A stroke that never left its starting point is dropped.
    pub fn end(&mut self, x: f32, y: f32, timestamp_ms: u64) -> Result<bool, SketchError> {
        let trail = self.recorder.end(Sample::new(x, y, timestamp_ms))?;

        if !trail.has_movement() {
            warn!(
                "SketchBoard::end: discarding stroke without movement ({} samples)",
                trail.len()
            );
            self.empty = self.empty_before_stroke;
            self.emit(SketchEvent::StrokeDiscarded {
                reason: "no movement".to_string(),
            });
            return Ok(false);
        }

        let samples = trail.len();
        let segments = self.recorder.segment_count() - self.stroke_first_segment;
        self.history.record(trail);
        debug!(
            "SketchBoard::end: recorded stroke ({} samples, {} segments)",
            samples, segments
        );

        self.emit(SketchEvent::StrokeCompleted { samples, segments });
        self.emit_history_changed();
        Ok(true)
    }

    /// Undo up to `steps` strokes and rebuild the outputs now
    pub fn undo(&mut self, steps: usize) -> Result<usize, SketchError> {
        self.ensure_idle()?;
        let moved = self.history.undo(steps);
        if moved > 0 {
            self.rebuild()?;
            self.emit_history_changed();
        }
        Ok(moved)
    }

    /// Redo up to `steps` entries and rebuild the outputs now
    pub fn redo(&mut self, steps: usize) -> Result<usize, SketchError> {
        self.ensure_idle()?;
        let moved = self.history.redo(steps);
        if moved > 0 {
            self.rebuild()?;
            self.emit_history_changed();
        }
        Ok(moved)
    }

    /// Undo up to `steps` strokes, deferring the rebuild to a [`ReplayJob`]
    pub fn prepare_undo(&mut self, steps: usize) -> Result<(usize, Option<ReplayJob>), SketchError> {
        self.ensure_idle()?;
        let moved = self.history.undo(steps);
        Ok((moved, self.prepare_replay(moved)))
    }

    /// Redo up to `steps` entries, deferring the rebuild to a [`ReplayJob`]
    pub fn prepare_redo(&mut self, steps: usize) -> Result<(usize, Option<ReplayJob>), SketchError> {
        self.ensure_idle()?;
        let moved = self.history.redo(steps);
        Ok((moved, self.prepare_replay(moved)))
    }

    fn prepare_replay(&mut self, moved: usize) -> Option<ReplayJob> {
        if moved == 0 {
            return None;
        }
        let generation = self.bump_generation();
        self.pending_replay = true;
        self.emit_history_changed();

        debug!(
            "SketchBoard: prepared replay generation {} ({} strokes)",
            generation,
            self.history.undo_count()
        );
        Some(ReplayJob::new(
            self.replay_trails().cloned().collect(),
            self.config.clone(),
            self.viewport,
            ReplayToken::new(generation, self.generation.clone()),
        ))
    }

    /// Install the result of a [`ReplayJob`] if it is still current
    pub fn apply_replay(&mut self, output: ReplayOutput) -> Result<(), ReplayError> {
        let current = self.generation();
        if output.generation != current || !self.pending_replay {
            debug!(
                "SketchBoard: dropping replay generation {} (board at {})",
                output.generation, current
            );
            self.emit(SketchEvent::ReplayCancelled {
                generation: output.generation,
            });
            return Err(ReplayError::Stale {
                generation: output.generation,
                current,
            });
        }

        let sink = self.recorder.sink_mut();
        sink.reset();
        for batch in &output.batches {
            sink.draw(batch);
        }
        self.recorder.replace_svg(output.svg, output.stats.segments);
        self.pending_replay = false;
        self.empty = output.stats.strokes == 0;

        for captured in output.mismatched {
            self.emit(SketchEvent::ViewportMismatch {
                captured,
                current: self.viewport,
            });
        }
        self.emit_replay_finished(output.generation, output.stats);
        Ok(())
    }

    fn emit_replay_finished(&self, generation: u64, stats: ReplayStats) {
        self.emit(SketchEvent::ReplayFinished {
            generation,
            strokes: stats.strokes,
            segments: stats.segments,
        });
    }

    /// Replay the active strokes into the live recorder
    fn rebuild(&mut self) -> Result<(), SketchError> {
        let generation = self.bump_generation();
        self.pending_replay = false;
        self.recorder.reset_output();

        let mut stats = ReplayStats::default();
        let mut mismatched = Vec::new();
        let trails: Vec<Arc<Trail>> = self.replay_trails().cloned().collect();
        for trail in &trails {
            let replayed =
                replay_trail(trail, &mut self.recorder, self.viewport).map_err(ReplayError::from)?;
            if replayed.viewport_mismatch {
                mismatched.push(trail.viewport());
            }
            stats.add(replayed);
        }
        self.empty = stats.strokes == 0;

        debug!(
            "SketchBoard: rebuilt generation {} ({} strokes, {} segments)",
            generation, stats.strokes, stats.segments
        );
        for captured in mismatched {
            self.emit(SketchEvent::ViewportMismatch {
                captured,
                current: self.viewport,
            });
        }
        self.emit_replay_finished(generation, stats);
        Ok(())
    }

    /// Wipe the visible content while keeping it redoable.
    ///
    /// An active stroke is abandoned. Returns how many strokes were cleared.
    pub fn clear(&mut self) -> usize {
        if self.recorder.cancel().is_ok() {
            debug!("SketchBoard::clear: abandoned the active stroke");
        }
        if !self.base_layer.is_empty() {
            info!(
                "SketchBoard: dropping {} strokes kept without history",
                self.base_layer.len()
            );
            self.base_layer.clear();
        }
        let cleared = self.history.clear();
        self.bump_generation();
        self.pending_replay = false;
        self.recorder.reset_output();
        self.empty = true;

        info!("SketchBoard: cleared {} strokes", cleared);
        self.emit(SketchEvent::Cleared { strokes: cleared });
        self.emit_history_changed();
        cleared
    }

    /// Drop undo and redo history; the current picture stays.
    ///
    /// The visible strokes move to the base layer, which later rebuilds
    /// replay first and which only [`SketchBoard::clear`] removes.
    pub fn clear_histories(&mut self) {
        self.base_layer
            .extend(self.history.active_trails().iter().cloned());
        self.history.destroy();
        self.emit_history_changed();
    }

    /// Render the vector document at the viewport size
    pub fn build_svg(&self) -> String {
        self.build_svg_with(self.viewport.width, self.viewport.height)
    }

    pub fn build_svg_with(&self, width: u32, height: u32) -> String {
        self.recorder.svg().build(width, height)
    }

    /// Replace the configuration; applies from the next stroke
    pub fn set_config(&mut self, config: SketchConfig) -> Result<(), SketchError> {
        config.validate()?;
        self.history.set_policy(config.redo_policy);
        self.recorder.set_config(config.clone());
        self.config = config;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        debug!("SketchBoard: mode {:?}", mode);
        self.config.mode = mode;
        self.recorder.set_config(self.config.clone());
    }

    pub fn set_pen_color(&mut self, color: [f32; 4]) {
        self.config.pen_color = color;
        self.recorder.set_config(self.config.clone());
    }

    /// Change the canvas size used for new strokes and for rendering
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            info!(
                "SketchBoard: viewport {}x{} -> {}x{}",
                self.viewport.width, self.viewport.height, viewport.width, viewport.height
            );
        }
        self.viewport = viewport;
    }
}
