//! Sketch engine - stroke smoothing, variable width and undoable history
//!
//! This crate turns timestamped pointer samples into smooth, velocity-modulated
//! strokes:
//! - [`curve`] - Cubic Bézier fitting over a four-sample window
//! - [`width`] - Stroke width from filtered pointer velocity
//! - [`raster`] - Per-segment draw steps and the [`RasterSink`] seam
//! - [`svg`] - Vector path document accumulated from the same segments
//! - [`recorder`] - Live stroke state machine feeding both outputs
//! - [`history`] - Undo/redo of whole strokes, rebuilt by replay
//! - [`board`] - Per-canvas façade with events and deferred replays

pub mod board;
pub mod constants;
pub mod curve;
pub mod error;
pub mod events;
pub mod history;
pub mod raster;
pub mod recorder;
pub mod svg;
pub mod types;
pub mod width;

pub use board::{
    InputEvent, Phase, ReplayError, ReplayJob, ReplayOutput, ReplayToken, SharedSketchBoard,
    SketchBoard,
};
pub use constants::*;
pub use error::SketchError;
pub use events::SketchEvent;
pub use history::{HistoryEntry, HistoryManager, ReplayStats, Trail};
pub use raster::{NullSink, RasterSink, RecordingSink};
pub use recorder::{RecorderError, SegmentOutput, StrokeRecorder, StrokeSetup};
pub use svg::SvgBuilder;
pub use types::*;
pub use width::StrokeWidthState;

pub use sketchpad_config::{ConfigError, PenParams, SketchConfig};
