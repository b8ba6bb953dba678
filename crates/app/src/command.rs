//! JSON-lines commands accepted on stdin

use serde::Deserialize;
use sketch::{DrawMode, InputEvent};

fn one_step() -> usize {
    1
}

/// One line of host input
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// `{"type":"input","x":1,"y":2,"timestamp_ms":0,"phase":"begin"}`
    Input(InputEvent),
    Undo {
        #[serde(default = "one_step")]
        steps: usize,
    },
    Redo {
        #[serde(default = "one_step")]
        steps: usize,
    },
    Clear,
    ClearHistories,
    Mode { mode: DrawMode },
    Color { color: [f32; 4] },
    /// Print the current document without waiting for end of input
    Svg,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
