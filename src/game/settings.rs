//! World configuration, loadable from JSON.

use crate::{config, WildwoodError, WildwoodResult};
use crate::game::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable parameters of one simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the world's random number generator
    pub seed: u64,
    /// Screen width in cells
    pub screen_width: i32,
    /// Screen height in cells
    pub screen_height: i32,
    /// Pixel size of one cell, used for light radii
    pub cell_size: f32,
    /// In-game minutes that pass per world tick
    pub minutes_per_tick: u32,
    /// Hour of day the session starts at
    pub start_hour: u32,
    /// Ticks between hunger drops
    pub hunger_interval: u32,
    /// Notifications kept in the status log
    pub max_notifications: usize,
    /// Wildlife spawned per screen by the initial seeding
    pub creatures_per_screen: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            screen_width: config::SCREEN_WIDTH,
            screen_height: config::SCREEN_HEIGHT,
            cell_size: config::CELL_SIZE,
            minutes_per_tick: config::MINUTES_PER_TICK,
            start_hour: 8,
            hunger_interval: config::HUNGER_INTERVAL,
            max_notifications: config::MAX_NOTIFICATIONS,
            creatures_per_screen: 6,
        }
    }
}

impl WorldConfig {
    /// Default configuration with a fixed seed.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Screen dimensions as a point.
    pub fn screen_size(&self) -> Point {
        Point::new(self.screen_width, self.screen_height)
    }

    /// Checks that the screen geometry is usable.
    pub fn validate(&self) -> WildwoodResult<()> {
        if self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(WildwoodError::InvalidState(format!(
                "screen must be at least 1x1, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            return Err(WildwoodError::InvalidState(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }

    /// Parses and validates a configuration.
    pub fn from_json(json: &str) -> WildwoodResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> WildwoodResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> WildwoodResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> WildwoodResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
