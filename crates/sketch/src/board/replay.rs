//! Deferred rebuilds of the board outputs.
//!
//! A [`ReplayJob`] owns a snapshot of the trails to replay and a
//! [`ReplayToken`] for the board generation it was prepared under. It can run
//! on any thread; the board applies its [`ReplayOutput`] only while that
//! generation is still current, so a late result never overwrites newer
//! content.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sketchpad_config::SketchConfig;
use tracing::debug;

use crate::history::{ReplayStats, Trail, replay_trail};
use crate::raster::RecordingSink;
use crate::recorder::{RecorderError, StrokeRecorder};
use crate::svg::SvgBuilder;
use crate::types::{RasterBatch, Viewport};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("Replay for generation {0} was superseded")]
    Cancelled(u64),
    #[error("Replay for generation {generation} is stale (board is at {current})")]
    Stale { generation: u64, current: u64 },
    #[error("Recorder error during replay: {0}")]
    Recorder(#[from] RecorderError),
}

/// Ties a replay to the board generation it was prepared under
#[derive(Debug, Clone)]
pub struct ReplayToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl ReplayToken {
    pub(crate) fn new(generation: u64, current: Arc<AtomicU64>) -> Self {
        Self {
            generation,
            current,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once the board has moved to a newer generation
    pub fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::Acquire) != self.generation
    }
}

/// Rebuilt outputs ready to be installed on the board
#[derive(Debug, Clone)]
pub struct ReplayOutput {
    pub generation: u64,
    pub svg: SvgBuilder,
    pub batches: Vec<RasterBatch>,
    pub stats: ReplayStats,
    /// Viewports of trails that did not match the replay target
    pub mismatched: Vec<Viewport>,
}

/// Snapshot of everything a replay needs
#[derive(Debug, Clone)]
pub struct ReplayJob {
    trails: Vec<Arc<Trail>>,
    config: SketchConfig,
    viewport: Viewport,
    token: ReplayToken,
}

impl ReplayJob {
    pub(crate) fn new(
        trails: Vec<Arc<Trail>>,
        config: SketchConfig,
        viewport: Viewport,
        token: ReplayToken,
    ) -> Self {
        Self {
            trails,
            config,
            viewport,
            token,
        }
    }

    pub fn generation(&self) -> u64 {
        self.token.generation()
    }

    pub fn token(&self) -> &ReplayToken {
        &self.token
    }

    pub fn trail_count(&self) -> usize {
        self.trails.len()
    }

    /// Replay every trail into fresh outputs.
    ///
    /// The token is checked before each trail; once the board has moved on
    /// the job stops with [`ReplayError::Cancelled`].
    pub fn run(self) -> Result<ReplayOutput, ReplayError> {
        let generation = self.token.generation();
        let mut recorder = StrokeRecorder::new(self.config, RecordingSink::new());
        let mut stats = ReplayStats::default();
        let mut mismatched = Vec::new();

        for trail in &self.trails {
            if self.token.is_cancelled() {
                debug!(
                    "ReplayJob: generation {} cancelled after {} of {} strokes",
                    generation,
                    stats.strokes,
                    self.trails.len()
                );
                return Err(ReplayError::Cancelled(generation));
            }
            let replayed = replay_trail(trail, &mut recorder, self.viewport)?;
            if replayed.viewport_mismatch {
                mismatched.push(trail.viewport());
            }
            stats.add(replayed);
        }

        let (svg, sink) = recorder.into_outputs();
        debug!(
            "ReplayJob: generation {} rebuilt {} strokes, {} segments",
            generation, stats.strokes, stats.segments
        );
        Ok(ReplayOutput {
            generation,
            svg,
            batches: sink.into_batches(),
            stats,
            mismatched,
        })
    }
}
