//! Simulation configuration with documented constants
//!
//! All tunable parameters are collected here with explanations of their
//! purpose and how they interact with each other.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::{Result, SimError};
use crate::creature::kind::CreatureKind;

/// Configuration for the simulation
///
/// The defaults match a small, crowded map where interactions are frequent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Map width in world units; creature x positions run `0..=map_width`.
    pub map_width: i32,

    /// Map height in world units; creature y positions run `0..=map_height`.
    pub map_height: i32,

    /// Size of each cell in the spatial hash grid (world units)
    ///
    /// The detection pass only compares a cell against itself and its
    /// immediate neighbors, so every interaction range must fit within one
    /// cell. `validate` rejects a cell size smaller than the largest
    /// interaction range in the rule table.
    pub cell_size: i32,

    /// Movement/detection tick interval in milliseconds
    ///
    /// One tick moves every living creature and runs one detection pass.
    pub tick_interval_ms: u64,

    /// Resolver idle sleep in milliseconds when the event queue is empty
    pub resolver_idle_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map_width: 50,
            map_height: 50,
            cell_size: 20,
            tick_interval_ms: 500,
            resolver_idle_ms: 10,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map_width <= 0 || self.map_height <= 0 {
            return Err(SimError::InvalidConfig(format!(
                "map dimensions must be positive, got {}x{}",
                self.map_width, self.map_height
            )));
        }

        if self.cell_size <= 0 {
            return Err(SimError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }

        // The four-offset neighbor scan misses pairs more than one cell
        // apart, so no interaction range may exceed the cell size.
        for kind in CreatureKind::ALL {
            if kind.interaction_range() > self.cell_size {
                return Err(SimError::InvalidConfig(format!(
                    "interaction range of {} ({}) exceeds cell_size ({})",
                    kind.as_str(),
                    kind.interaction_range(),
                    self.cell_size
                )));
            }
        }

        if self.tick_interval_ms == 0 {
            return Err(SimError::InvalidConfig(
                "tick_interval_ms must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Load and validate a configuration from a TOML file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn resolver_idle(&self) -> Duration {
        Duration::from_millis(self.resolver_idle_ms)
    }
}
