//! Top-level error type for board operations.

use sketchpad_config::ConfigError;

use crate::board::ReplayError;
use crate::recorder::RecorderError;

#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    /// Input arrived in a phase the board cannot accept (e.g. move before begin)
    #[error("Input protocol violation: {0}")]
    Protocol(#[from] RecorderError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Replay failed: {0}")]
    Replay(#[from] ReplayError),
    #[error("Replay task failed: {0}")]
    ReplayTask(#[from] tokio::task::JoinError),
    #[error("Sketch board lock poisoned")]
    LockPoisoned,
}
