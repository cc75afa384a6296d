//=========================================================================
// Application Configuration
//=========================================================================
//
// TOML-backed settings for the window, the fixed timestep and the
// runtime. Every field has a default, so a partial (or empty) file is
// valid.
//
// ```toml
// [window]
// title = "States"
// width = 640
// height = 480
//
// [timing]
// ticks_per_second = 60.0
//
// [runtime]
// channel_capacity = 128
// show_statistics = true
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    /// Parsed, but a value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

//=== Sections ============================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stagecraft".to_owned(),
            width: 640,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fixed update rate of the state stack.
    pub ticks_per_second: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Capacity of the platform event channel.
    pub channel_capacity: usize,

    /// Draw the frames-per-second overlay.
    pub show_statistics: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 128,
            show_statistics: false,
        }
    }
}

//=== AppConfig ===========================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub timing: TimingConfig,
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(target: "app", "Loading configuration from {}", path.display());

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks the values the builder would otherwise reject with a panic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tps = self.timing.ticks_per_second;
        if !(tps.is_finite() && tps > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "timing.ticks_per_second must be positive, got {}",
                tps
            )));
        }

        if self.runtime.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "runtime.channel_capacity must be positive".to_owned(),
            ));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
