//! # Generation Module
//!
//! Procedural generation of dungeon layouts and of connected room paths.
//!
//! The [`DungeonBuilder`] turns a grid of single-cell rooms into one connected
//! structure, the [`RoomPathSelector`] grows a connected subset of the
//! finished rooms, and the [`Sampler`] makes every random decision for both so
//! a seed fully determines the outcome.

pub mod builder;
pub mod sampler;
pub mod selector;

pub use builder::*;
pub use sampler::*;
pub use selector::*;

use crate::{config, WarrenError, WarrenResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for dungeon generation.
///
/// Controls the grid size, the size thresholds that decide between merging
/// two rooms and linking them with a door, and the length of selected paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Desired room count; informational only, reported in logs
    pub target_rooms: usize,
    /// Largest room the merge branch may produce
    pub max_room_size: usize,
    /// Rooms above this size are always linked with a door, never merged
    pub first_stop_size: usize,
    /// Fewest rooms in a selected path
    pub min_path_rooms: usize,
    /// Most rooms in a selected path
    pub max_path_rooms: usize,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.width, 20);
    /// assert!(config.first_stop_size < config.max_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_GRID_WIDTH,
            height: config::DEFAULT_GRID_HEIGHT,
            target_rooms: config::DEFAULT_TARGET_ROOMS,
            max_room_size: config::DEFAULT_MAX_ROOM_SIZE,
            first_stop_size: config::DEFAULT_FIRST_STOP_SIZE,
            min_path_rooms: config::DEFAULT_MIN_PATH_ROOMS,
            max_path_rooms: config::DEFAULT_MAX_PATH_ROOMS,
        }
    }

    /// Creates a configuration for testing with a small grid.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            width: 6,
            height: 6,
            target_rooms: 4,
            min_path_rooms: 2,
            max_path_rooms: 4,
            ..Self::new(seed)
        }
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take their default values. The loaded configuration is
    /// validated before it is returned.
    pub fn from_json_file(path: impl AsRef<Path>) -> WarrenResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> WarrenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of cells on the grid.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Checks that the parameters describe a buildable dungeon.
    pub fn validate(&self) -> WarrenResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WarrenError::InvalidConfig(format!(
                "grid must have at least one cell, got {}x{}",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(WarrenError::InvalidConfig(format!(
                "grid {}x{} is too large",
                self.width, self.height
            )));
        }
        if self.max_room_size == 0 {
            return Err(WarrenError::InvalidConfig(
                "max_room_size must be at least 1".to_string(),
            ));
        }
        if self.min_path_rooms == 0 || self.min_path_rooms > self.max_path_rooms {
            return Err(WarrenError::InvalidConfig(format!(
                "path length range {}..={} is empty or starts at zero",
                self.min_path_rooms, self.max_path_rooms
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// Generators take all their randomness from the [`Sampler`] they are handed,
/// so the same seed always reproduces the same content.
pub trait Generator<T> {
    /// Generates content, drawing every random choice from `sampler`.
    fn generate(&mut self, sampler: &mut Sampler) -> WarrenResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T) -> WarrenResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation.
pub mod utils {
    use super::*;
    use log::warn;

    /// Creates a seeded sampler from the config.
    pub fn create_sampler(config: &GenerationConfig) -> Sampler {
        Sampler::seeded(config.seed)
    }

    /// Draws a path length from the configured range, capped at `room_count`.
    pub fn path_length(
        config: &GenerationConfig,
        sampler: &mut Sampler,
        room_count: usize,
    ) -> usize {
        let wanted = sampler.range(config.min_path_rooms..=config.max_path_rooms);
        if wanted > room_count {
            warn!("Requested a path of {wanted} rooms but the dungeon only has {room_count}");
            return room_count;
        }
        wanted
    }
}
