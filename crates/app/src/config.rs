//! Application configuration read from the environment

use sketchpad_config::{ConfigError, SketchConfig, Viewport};

/// JSON pen/history configuration, e.g. `{"max_width": 9.0}`
pub const CONFIG_ENV: &str = "SKETCHPAD_CONFIG";
/// Canvas size as `WIDTHxHEIGHT`
pub const VIEWPORT_ENV: &str = "SKETCHPAD_VIEWPORT";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub sketch: SketchConfig,
    pub viewport: Viewport,
}

impl AppConfig {
    /// Read both variables; unset means default
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = std::env::var(CONFIG_ENV).ok();
        let viewport = std::env::var(VIEWPORT_ENV).ok();
        Self::parse(config.as_deref(), viewport.as_deref())
    }

    pub fn parse(config: Option<&str>, viewport: Option<&str>) -> Result<Self, ConfigError> {
        let sketch = match config {
            Some(json) if !json.trim().is_empty() => SketchConfig::from_json_str(json)?,
            _ => SketchConfig::default(),
        };
        let viewport = match viewport {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => Viewport::default(),
        };
        Ok(Self { sketch, viewport })
    }
}
