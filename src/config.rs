//! Tunable game constants.
//!
//! Every number the engine uses lives in [`GameConfig`], so the physics can
//! be retuned from a JSON file without touching the algorithms.  Keys that
//! are missing from the file keep their default value.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::info;
use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_WIDTH: f64 = 600.0;
const DEFAULT_HEIGHT: f64 = 400.0;
const DEFAULT_BIRD_WIDTH: f64 = 42.0;
const DEFAULT_BIRD_HEIGHT: f64 = 30.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield_width: f64,
    pub playfield_height: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    /// Fixed horizontal position of the bird's left edge.
    pub bird_x: f64,
    pub obstacle_width: f64,
    pub tick_interval_ms: u64,
    /// Added to the bird's velocity every tick (pixels / tick²).
    pub gravity: f64,
    /// Upward speed a flap sets (pixels / tick).
    pub flap_impulse: f64,
    pub initial_lives: u32,
    /// Pixels every obstacle moves left per tick.
    pub scroll_speed: f64,
    pub bounce_min: f64,
    pub bounce_max: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            playfield_width: DEFAULT_WIDTH,
            playfield_height: DEFAULT_HEIGHT,
            bird_width: DEFAULT_BIRD_WIDTH,
            bird_height: DEFAULT_BIRD_HEIGHT,
            bird_x: DEFAULT_WIDTH * 0.3 - DEFAULT_BIRD_WIDTH / 2.0,
            obstacle_width: 50.0,
            tick_interval_ms: 20,
            gravity: 0.4,
            flap_impulse: 6.0,
            initial_lives: 3,
            scroll_speed: 3.0,
            bounce_min: 2.0,
            bounce_max: 5.0,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("bird_width", self.bird_width),
            ("bird_height", self.bird_height),
            ("obstacle_width", self.obstacle_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be at least 1".into()));
        }
        if !(self.scroll_speed.is_finite() && self.scroll_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scroll_speed must be positive, got {}",
                self.scroll_speed
            )));
        }
        if !(self.bounce_min > 0.0 && self.bounce_min <= self.bounce_max) {
            return Err(ConfigError::Invalid(format!(
                "bounce range [{}, {}] must be positive and ordered",
                self.bounce_min, self.bounce_max
            )));
        }
        if self.bird_height >= self.playfield_height || self.bird_width >= self.playfield_width {
            return Err(ConfigError::Invalid(
                "bird does not fit inside the playfield".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
