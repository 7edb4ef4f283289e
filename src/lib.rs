//! # Warren Dungeon Generator
//!
//! Procedural dungeon layouts built by weaving single grid cells into rooms.
//!
//! ## Architecture Overview
//!
//! Warren starts from a fixed-size grid where every cell is its own room and its
//! own connectivity component. It then repeatedly picks two bordering
//! components and either merges a bordering room pair into one larger room or
//! links them with a door, until the whole grid is one connected structure:
//!
//! - **Dungeon**: Arena owning the grid, every live room and every live
//!   connectivity component, addressed by stable handles
//! - **Generation**: The builder that drives merging, the seeded sampler that
//!   makes every random decision, and the path selector that grows a connected
//!   subset of rooms
//! - **Session**: Regenerate / advance triggers used by the viewer
//! - **Rendering**: Text and macroquad renderers that read the finished layout
//!
//! ## Example
//!
//! ```
//! use warren::{DungeonBuilder, GenerationConfig, RoomPathSelector, Sampler};
//!
//! let config = GenerationConfig::for_testing(7);
//! let mut sampler = Sampler::seeded(config.seed);
//! let mut builder = DungeonBuilder::new(config).unwrap();
//! let dungeon = builder.construct_dungeon(&mut sampler).unwrap();
//!
//! assert_eq!(dungeon.component_count(), 1);
//! let path = RoomPathSelector::new().select(&dungeon, 3, &mut sampler).unwrap();
//! assert_eq!(path.len(), 3);
//! ```

pub mod dungeon;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod session;

// Core module re-exports
pub use dungeon::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use session::*;

/// Core error type for the Warren generator.
#[derive(thiserror::Error, Debug)]
pub enum WarrenError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A door was requested from a room to itself
    #[error("Invalid door: {0}")]
    InvalidDoor(String),

    /// A cell was claimed to border a room it does not touch
    #[error("Adjacency violation: {0}")]
    AdjacencyViolation(String),

    /// Two rooms were linked that are not recorded as bordering
    #[error("Rooms not adjacent: {0}")]
    NotAdjacent(String),

    /// The sampler was asked to pick from nothing
    #[error("Cannot pick from an empty sequence")]
    EmptySequence,

    /// The sampler's predicate rejected every candidate
    #[error("No candidate satisfies the predicate")]
    NoMatch,

    /// Path selection ran out of reachable rooms
    #[error("Path selection exhausted: picked {picked} of {requested} rooms")]
    Exhausted { requested: usize, picked: usize },

    /// Post-generation invariant check failed
    #[error("Consistency error: {0}")]
    ConsistencyError(String),

    /// A room or component was merged after it had already been retired
    #[error("Double retirement: {0}")]
    DoubleRetirement(String),
}

impl WarrenError {
    /// Whether this error signals a broken invariant rather than a normal failure.
    ///
    /// Fatal errors abort the current build. They are never retried.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            WarrenError::Io(_)
                | WarrenError::Serde(_)
                | WarrenError::InvalidConfig(_)
                | WarrenError::Exhausted { .. }
        )
    }
}

/// Result type used throughout the Warren codebase.
pub type WarrenResult<T> = Result<T, WarrenError>;

/// Version information for the generator.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generator configuration constants.
pub mod config {
    /// Default grid width in cells
    pub const DEFAULT_GRID_WIDTH: usize = 20;

    /// Default grid height in cells
    pub const DEFAULT_GRID_HEIGHT: usize = 20;

    /// Informational room count target, only reported in logs
    pub const DEFAULT_TARGET_ROOMS: usize = 10;

    /// Largest room a merge is allowed to produce
    pub const DEFAULT_MAX_ROOM_SIZE: usize = 6;

    /// Rooms larger than this always get a door instead of a merge
    pub const DEFAULT_FIRST_STOP_SIZE: usize = 5;

    /// Smallest number of rooms in a selected path
    pub const DEFAULT_MIN_PATH_ROOMS: usize = 5;

    /// Largest number of rooms in a selected path
    pub const DEFAULT_MAX_PATH_ROOMS: usize = 14;

    /// Size of one cell in the viewer, in pixels
    pub const CELL_PIXELS: f32 = 20.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(WarrenError::ConsistencyError("x".to_string()).is_fatal());
        assert!(WarrenError::DoubleRetirement("x".to_string()).is_fatal());
        assert!(WarrenError::EmptySequence.is_fatal());
        assert!(!WarrenError::Exhausted {
            requested: 4,
            picked: 2
        }
        .is_fatal());
        assert!(!WarrenError::InvalidConfig("x".to_string()).is_fatal());
    }

    #[test]
    fn test_exhausted_message() {
        let error = WarrenError::Exhausted {
            requested: 9,
            picked: 4,
        };
        assert_eq!(
            error.to_string(),
            "Path selection exhausted: picked 4 of 9 rooms"
        );
    }
}
