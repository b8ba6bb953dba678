//! Undo/redo history of completed strokes.
//!
//! Strokes are stored as raw [`Trail`]s rather than pixels. Undo and redo
//! only move trails between two stacks; the visible result is rebuilt by
//! replaying the trails left on the undo stack through a fresh recorder,
//! which is deterministic because replay only uses stored timestamps.

mod trail;

pub use trail::Trail;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::raster::RasterSink;
use crate::recorder::{RecorderError, StrokeRecorder, StrokeSetup};
use crate::types::{RedoPolicy, Viewport};

/// An entry on the redo stack
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// A single undone stroke
    Stroke(Arc<Trail>),
    /// Every stroke removed by one `clear`, oldest first; redone as a unit
    Cleared(Vec<Arc<Trail>>),
}

impl HistoryEntry {
    /// Number of strokes this entry restores
    pub fn stroke_count(&self) -> usize {
        match self {
            Self::Stroke(_) => 1,
            Self::Cleared(trails) => trails.len(),
        }
    }
}

/// Outcome of replaying one trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrailReplay {
    pub segments: usize,
    /// Captured under a different viewport than the replay target
    pub viewport_mismatch: bool,
}

/// Totals for a replay of several trails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    pub strokes: usize,
    pub segments: usize,
    pub viewport_mismatches: usize,
}

impl ReplayStats {
    pub fn add(&mut self, trail: TrailReplay) {
        self.strokes += 1;
        self.segments += trail.segments;
        if trail.viewport_mismatch {
            self.viewport_mismatches += 1;
        }
    }
}

/// Undo and redo stacks of completed strokes
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    /// Completed strokes, most recent at end
    undo_stack: Vec<Arc<Trail>>,
    /// Undone entries, most recently undone at end
    redo_stack: Vec<HistoryEntry>,
    policy: RedoPolicy,
}

impl HistoryManager {
    pub fn new(policy: RedoPolicy) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RedoPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RedoPolicy) {
        self.policy = policy;
    }

    /// Store a completed stroke.
    ///
    /// Under [`RedoPolicy::Discard`] this starts a new timeline and drops
    /// the redo stack.
    pub fn record(&mut self, trail: Trail) {
        if self.policy == RedoPolicy::Discard && !self.redo_stack.is_empty() {
            debug!(
                "History: new stroke drops {} redo entries",
                self.redo_stack.len()
            );
            self.redo_stack.clear();
        }
        self.undo_stack.push(Arc::new(trail));
    }

    /// Move up to `steps` strokes to the redo stack; returns how many moved
    pub fn undo(&mut self, steps: usize) -> usize {
        if self.undo_stack.is_empty() {
            warn!("History: nothing to undo");
            return 0;
        }

        let count = steps.min(self.undo_stack.len());
        for _ in 0..count {
            if let Some(trail) = self.undo_stack.pop() {
                self.redo_stack.push(HistoryEntry::Stroke(trail));
            }
        }

        info!(
            "History: undid {} of {} requested ({} left, {} redoable)",
            count,
            steps,
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        count
    }

    /// Move up to `steps` entries back; a cleared batch counts as one step
    pub fn redo(&mut self, steps: usize) -> usize {
        if self.redo_stack.is_empty() {
            warn!("History: nothing to redo");
            return 0;
        }

        let count = steps.min(self.redo_stack.len());
        for _ in 0..count {
            match self.redo_stack.pop() {
                Some(HistoryEntry::Stroke(trail)) => self.undo_stack.push(trail),
                Some(HistoryEntry::Cleared(trails)) => self.undo_stack.extend(trails),
                None => break,
            }
        }

        info!(
            "History: redid {} of {} requested ({} active, {} redoable)",
            count,
            steps,
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        count
    }

    /// Remove every stroke in an undoable way; returns how many were removed.
    ///
    /// [`RedoPolicy::Discard`] undoes them one by one. [`RedoPolicy::Retain`]
    /// bundles them into a single [`HistoryEntry::Cleared`] marker so one
    /// redo brings them all back.
    pub fn clear(&mut self) -> usize {
        let count = self.undo_stack.len();
        if count == 0 {
            return 0;
        }

        match self.policy {
            RedoPolicy::Discard => {
                self.undo(count);
            }
            RedoPolicy::Retain => {
                let batch: Vec<Arc<Trail>> = self.undo_stack.drain(..).collect();
                self.redo_stack.push(HistoryEntry::Cleared(batch));
                info!("History: cleared {} strokes into one redo entry", count);
            }
        }
        count
    }

    /// Drop both stacks irreversibly
    pub fn destroy(&mut self) {
        info!(
            "History: destroyed ({} active, {} redoable)",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Strokes that make up the current picture, oldest first
    pub fn active_trails(&self) -> &[Arc<Trail>] {
        &self.undo_stack
    }

    pub fn undo_stack(&self) -> &[Arc<Trail>] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[HistoryEntry] {
        &self.redo_stack
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Replay the current picture into `recorder`
    pub fn replay_all<S: RasterSink>(
        &self,
        recorder: &mut StrokeRecorder<S>,
        viewport: Viewport,
    ) -> Result<ReplayStats, RecorderError> {
        replay_all(&self.undo_stack, recorder, viewport)
    }
}

/// Clear `recorder`'s outputs and replay `trails` in order.
pub fn replay_all<S: RasterSink>(
    trails: &[Arc<Trail>],
    recorder: &mut StrokeRecorder<S>,
    viewport: Viewport,
) -> Result<ReplayStats, RecorderError> {
    recorder.reset_output();
    let mut stats = ReplayStats::default();
    for trail in trails {
        stats.add(replay_trail(trail, recorder, viewport)?);
    }
    debug!(
        "replay_all: {} strokes, {} segments",
        stats.strokes, stats.segments
    );
    Ok(stats)
}

/// Feed one stored trail through begin/feed/end.
///
/// A trail captured under a different viewport is replayed anyway; the
/// mismatch is logged and reported.
pub fn replay_trail<S: RasterSink>(
    trail: &Trail,
    recorder: &mut StrokeRecorder<S>,
    viewport: Viewport,
) -> Result<TrailReplay, RecorderError> {
    let viewport_mismatch = trail.viewport() != viewport;
    if viewport_mismatch {
        warn!(
            "Replaying stroke captured at {}x{} onto {}x{}; it may not line up",
            trail.viewport().width,
            trail.viewport().height,
            viewport.width,
            viewport.height
        );
    }

    let Some((first, rest)) = trail.samples().split_first() else {
        return Ok(TrailReplay {
            segments: 0,
            viewport_mismatch,
        });
    };

    let before = recorder.segment_count();
    let setup = StrokeSetup::for_trail(trail);
    recorder.begin(*first, setup)?;

    match rest.split_last() {
        Some((last, middle)) => {
            for sample in middle {
                recorder.feed(*sample)?;
            }
            recorder.end(*last)?;
        }
        None => {
            recorder.end(*first)?;
        }
    }

    Ok(TrailReplay {
        segments: recorder.segment_count() - before,
        viewport_mismatch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RecordingSink;
    use crate::types::{DrawMode, Sample};
    use sketchpad_config::{PenParams, SketchConfig};

    fn trail(id: u64) -> Trail {
        let samples = (0..5)
            .map(|i| Sample::new(id as f32 * 20.0 + i as f32 * 7.0, i as f32 * 3.0, id * 1000 + i * 16))
            .collect();
        Trail::new(
            samples,
            DrawMode::Draw,
            [0.0, 0.0, 0.0, 1.0],
            Viewport::default(),
            PenParams::default(),
        )
    }

    fn ids(trails: &[Arc<Trail>]) -> Vec<u64> {
        trails
            .iter()
            .map(|t| t.first().map(|s| s.t / 1000).unwrap_or(u64::MAX))
            .collect()
    }

    fn redo_ids(entries: &[HistoryEntry]) -> Vec<u64> {
        entries
            .iter()
            .map(|e| match e {
                HistoryEntry::Stroke(t) => t.first().map(|s| s.t / 1000).unwrap_or(u64::MAX),
                HistoryEntry::Cleared(_) => u64::MAX,
            })
            .collect()
    }

    #[test]
    fn test_undo_more_than_available() {
        let mut history = HistoryManager::default();
        history.record(trail(1));
        history.record(trail(2));

        assert_eq!(history.undo(5), 2);
        assert!(history.undo_stack().is_empty());
        assert_eq!(history.redo_count(), 2);
        // Most recently undone (the first stroke) is on top
        assert_eq!(redo_ids(history.redo_stack()), vec![2, 1]);
    }

    #[test]
    fn test_empty_undo_redo_are_noops() {
        let mut history = HistoryManager::default();
        assert_eq!(history.undo(1), 0);
        assert_eq!(history.redo(3), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_inverse() {
        for k in 1..5 {
            let mut history = HistoryManager::default();
            for id in 0..k {
                history.record(trail(id));
            }
            let undo_before = history.undo_stack().to_vec();
            let redo_before = history.redo_stack().to_vec();

            assert_eq!(history.undo(1), 1);
            assert_eq!(history.redo(1), 1);

            assert_eq!(history.undo_stack(), undo_before.as_slice());
            assert_eq!(history.redo_stack(), redo_before.as_slice());
        }
    }

    #[test]
    fn test_record_discards_redo_by_default() {
        let mut history = HistoryManager::default();
        history.record(trail(1));
        history.record(trail(2));
        history.undo(1);
        assert!(history.can_redo());

        history.record(trail(3));
        assert!(!history.can_redo());
        assert_eq!(ids(history.active_trails()), vec![1, 3]);
    }

    #[test]
    fn test_record_retains_redo_when_configured() {
        let mut history = HistoryManager::new(RedoPolicy::Retain);
        history.record(trail(1));
        history.record(trail(2));
        history.undo(1);

        history.record(trail(3));
        assert_eq!(history.redo_count(), 1);
        history.redo(1);
        assert_eq!(ids(history.active_trails()), vec![1, 3, 2]);
    }

    #[test]
    fn test_clear_discard_policy_redoes_one_by_one() {
        let mut history = HistoryManager::default();
        for id in 0..3 {
            history.record(trail(id));
        }
        assert_eq!(history.clear(), 3);
        assert!(!history.can_undo());
        assert_eq!(history.redo_count(), 3);

        assert_eq!(history.redo(1), 1);
        assert_eq!(ids(history.active_trails()), vec![0]);
    }

    #[test]
    fn test_clear_retain_policy_redoes_batch() {
        let mut history = HistoryManager::new(RedoPolicy::Retain);
        for id in 0..3 {
            history.record(trail(id));
        }
        assert_eq!(history.clear(), 3);
        assert_eq!(history.redo_count(), 1);
        assert_eq!(history.redo_stack()[0].stroke_count(), 3);

        assert_eq!(history.redo(1), 1);
        assert_eq!(ids(history.active_trails()), vec![0, 1, 2]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_clear_empty_history() {
        let mut history = HistoryManager::new(RedoPolicy::Retain);
        assert_eq!(history.clear(), 0);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_destroy() {
        let mut history = HistoryManager::default();
        history.record(trail(1));
        history.record(trail(2));
        history.undo(1);
        history.destroy();
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn test_replay_matches_live_capture() {
        let config = SketchConfig::default();
        let viewport = Viewport::new(300, 200);
        let mut live = StrokeRecorder::new(config.clone(), RecordingSink::new());
        let mut history = HistoryManager::default();

        for id in 0..3u64 {
            let samples: Vec<Sample> = (0..8)
                .map(|i| {
                    Sample::new(
                        10.0 + id as f32 * 30.0 + i as f32 * 6.0,
                        20.0 + ((i * 7) % 5) as f32 * 4.0,
                        id * 5000 + i * 12,
                    )
                })
                .collect();
            live.begin(samples[0], StrokeSetup::from_config(&config, viewport))
                .unwrap();
            for s in &samples[1..7] {
                live.feed(*s).unwrap();
            }
            history.record(live.end(samples[7]).unwrap());
        }

        let mut replayed = StrokeRecorder::new(config, RecordingSink::new());
        let stats = history.replay_all(&mut replayed, viewport).unwrap();

        assert_eq!(stats.strokes, 3);
        assert_eq!(stats.segments, live.segment_count());
        assert_eq!(stats.viewport_mismatches, 0);
        assert_eq!(replayed.svg().build(300, 200), live.svg().build(300, 200));
        assert_eq!(replayed.sink().batches(), live.sink().batches());
    }

    #[test]
    fn test_replay_reports_viewport_mismatch() {
        let mut history = HistoryManager::default();
        history.record(trail(1));
        let mut recorder = StrokeRecorder::vector_only(SketchConfig::default());
        let stats = history
            .replay_all(&mut recorder, Viewport::new(10, 10))
            .unwrap();
        assert_eq!(stats.strokes, 1);
        assert_eq!(stats.viewport_mismatches, 1);
        assert!(!recorder.is_active());
    }

    #[test]
    fn test_replay_preserves_trail_mode() {
        let samples = (0..6)
            .map(|i| Sample::new(i as f32 * 8.0, 0.0, i * 20))
            .collect();
        let erase = Trail::new(
            samples,
            DrawMode::Erase,
            [1.0, 0.0, 0.0, 1.0],
            Viewport::default(),
            PenParams::default(),
        );
        let mut recorder = StrokeRecorder::new(SketchConfig::default(), RecordingSink::new());

        replay_all(&[Arc::new(erase)], &mut recorder, Viewport::default()).unwrap();
        assert!(
            recorder
                .sink()
                .batches()
                .iter()
                .all(|b| b.mode == DrawMode::Erase)
        );
        assert!(recorder.svg().is_empty());
    }
}
