//! Board lifecycle events for host integration hooks.

use crate::types::{DrawMode, Viewport};

/// Events emitted by a [`crate::board::SketchBoard`].
///
/// Listeners receive cloned events synchronously, after the board state
/// they describe has been updated.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchEvent {
    /// A stroke began at the given position
    StrokeStarted {
        x: f32,
        y: f32,
        timestamp_ms: u64,
        mode: DrawMode,
    },
    /// A stroke finished and was recorded in history
    StrokeCompleted { samples: usize, segments: usize },
    /// A stroke finished without moving and was not recorded
    StrokeDiscarded { reason: String },
    /// Undo/redo/clear changed the stacks
    HistoryChanged { undo_count: usize, redo_count: usize },
    /// A replay rebuilt the outputs
    ReplayFinished {
        generation: u64,
        strokes: usize,
        segments: usize,
    },
    /// A replay result arrived after the board moved on
    ReplayCancelled { generation: u64 },
    /// A stroke captured under another viewport was replayed
    ViewportMismatch { captured: Viewport, current: Viewport },
    /// The visible content was cleared
    Cleared { strokes: usize },
}
