//! Pointer input as delivered by the host.

use serde::{Deserialize, Serialize};

use crate::types::Sample;

/// Where an input event sits in a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Begin,
    Move,
    End,
}

/// One pointer event with a monotonic millisecond timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: u64,
    pub phase: Phase,
}

impl InputEvent {
    pub fn new(x: f32, y: f32, timestamp_ms: u64, phase: Phase) -> Self {
        Self {
            x,
            y,
            timestamp_ms,
            phase,
        }
    }

    pub fn sample(&self) -> Sample {
        Sample::new(self.x, self.y, self.timestamp_ms)
    }
}
