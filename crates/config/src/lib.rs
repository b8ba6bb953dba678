//! Shared configuration for sketchpad
//!
//! This crate provides the single source of truth for pen widths, eraser
//! width, velocity smoothing, draw mode, redo policy and viewport size,
//! shared by the stroke engine and the host binary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default minimum pen width in pixels
pub const DEFAULT_MIN_WIDTH: f32 = 3.0;

/// Default maximum pen width in pixels
pub const DEFAULT_MAX_WIDTH: f32 = 7.0;

/// Default eraser width in pixels
pub const DEFAULT_ERASER_WIDTH: f32 = 20.0;

/// Default share of the newest velocity reading kept by the smoothing filter
pub const DEFAULT_VELOCITY_FILTER_WEIGHT: f32 = 0.9;

/// Default pen color (opaque black)
pub const DEFAULT_PEN_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Default viewport width in pixels
pub const DEFAULT_WIDTH: u32 = 800;

/// Default viewport height in pixels
pub const DEFAULT_HEIGHT: u32 = 600;

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {field}: {value} is not a finite number")]
    NotFinite { field: &'static str, value: f32 },
    #[error("Invalid {field}: {value} must be greater than zero")]
    NotPositive { field: &'static str, value: f32 },
    #[error("min_width ({min}) exceeds max_width ({max})")]
    WidthRange { min: f32, max: f32 },
    #[error("velocity_filter_weight must lie strictly between 0 and 1, got {0}")]
    FilterWeight(f32),
    #[error("Invalid viewport {0:?}, expected WIDTHxHEIGHT")]
    Viewport(String),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What a stroke does to the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Paint with the pen color and velocity-modulated width
    #[default]
    Draw,
    /// Clear paint with a fixed eraser width
    Erase,
}

/// What happens to undone strokes when history moves on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedoPolicy {
    /// A new stroke drops the redo stack; `clear` undoes strokes one by one
    #[default]
    Discard,
    /// A new stroke keeps the redo stack; `clear` stores a single batch
    /// marker that redoes every cleared stroke in one step
    Retain,
}

/// Screen orientation derived from viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Drawing surface dimensions active while a stroke is captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    /// Create a viewport with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square viewports count as portrait
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

impl FromStr for Viewport {
    type Err = ConfigError;

    /// Parse `WIDTHxHEIGHT`, e.g. `800x600`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Viewport(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        Ok(Self { width, height })
    }
}

/// Width settings a stroke is smoothed and rasterized with.
///
/// Captured per stroke so replay does not depend on later config changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenParams {
    pub min_width: f32,
    pub max_width: f32,
    pub eraser_width: f32,
    pub velocity_filter_weight: f32,
}

impl Default for PenParams {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            max_width: DEFAULT_MAX_WIDTH,
            eraser_width: DEFAULT_ERASER_WIDTH,
            velocity_filter_weight: DEFAULT_VELOCITY_FILTER_WEIGHT,
        }
    }
}

impl PenParams {
    /// Width a new stroke starts from
    pub fn initial_width(&self) -> f32 {
        (self.min_width + self.max_width) / 2.0
    }
}

/// Pen and history configuration for a sketch board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Width floor reached at high input velocity
    pub min_width: f32,
    /// Width approached as input velocity goes to zero
    pub max_width: f32,
    /// Fixed width used in erase mode
    pub eraser_width: f32,
    /// Weight of the newest velocity reading, in (0, 1)
    pub velocity_filter_weight: f32,
    /// Pen color as linear RGBA
    pub pen_color: [f32; 4],
    /// Active draw mode for new strokes
    pub mode: DrawMode,
    /// Redo stack behaviour
    pub redo_policy: RedoPolicy,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            max_width: DEFAULT_MAX_WIDTH,
            eraser_width: DEFAULT_ERASER_WIDTH,
            velocity_filter_weight: DEFAULT_VELOCITY_FILTER_WEIGHT,
            pen_color: DEFAULT_PEN_COLOR,
            mode: DrawMode::Draw,
            redo_policy: RedoPolicy::Discard,
        }
    }
}

impl SketchConfig {
    /// Parse a JSON document; missing fields take their defaults.
    /// The result is validated before it is returned.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the width modulator
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_width", self.min_width),
            ("max_width", self.max_width),
            ("eraser_width", self.eraser_width),
            ("velocity_filter_weight", self.velocity_filter_weight),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        if self.min_width <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "min_width",
                value: self.min_width,
            });
        }
        if self.eraser_width <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "eraser_width",
                value: self.eraser_width,
            });
        }
        if self.min_width > self.max_width {
            return Err(ConfigError::WidthRange {
                min: self.min_width,
                max: self.max_width,
            });
        }
        if self.velocity_filter_weight <= 0.0 || self.velocity_filter_weight >= 1.0 {
            return Err(ConfigError::FilterWeight(self.velocity_filter_weight));
        }
        Ok(())
    }

    /// Width a new stroke starts from
    pub fn initial_width(&self) -> f32 {
        self.pen().initial_width()
    }

    /// Snapshot of the width settings
    pub fn pen(&self) -> PenParams {
        PenParams {
            min_width: self.min_width,
            max_width: self.max_width,
            eraser_width: self.eraser_width,
            velocity_filter_weight: self.velocity_filter_weight,
        }
    }

    /// Pen color as `#rrggbb` (alpha is dropped)
    pub fn pen_color_hex(&self) -> String {
        color_to_hex(self.pen_color)
    }
}

/// Format a linear RGBA color as `#rrggbb`
pub fn color_to_hex(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color[0]),
        channel(color[1]),
        channel(color[2])
    )
}
