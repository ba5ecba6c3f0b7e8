//! # Game Module
//!
//! Core game state management, the overworld and battle engines, and the
//! top-level state machine that ties them together.
//!
//! This module contains the fundamental building blocks of RedEmu:
//! - Tile grids, map templates and the interaction registry
//! - Camera, movement and interaction resolution on the overworld
//! - Word-wrapped, page-by-page message presentation
//! - The turn-based battle engine and its deferred triggers
//! - The three-state game controller

pub mod battle;
pub mod camera;
pub mod overworld;
pub mod schedule;
pub mod state;
pub mod textbox;
pub mod world;

pub use battle::*;
pub use camera::*;
pub use overworld::*;
pub use schedule::*;
pub use state::*;
pub use textbox::*;
pub use world::*;

use crate::{RedEmuError, RedEmuResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Represents a tile coordinate on a map.
///
/// # Examples
///
/// ```
/// use redemu::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let surrounding = pos.with_surroundings();
/// assert_eq!(surrounding.len(), 9); // Own tile plus the 8 neighbours
/// assert_eq!(surrounding[0], pos);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position followed by all 8 surrounding positions.
    ///
    /// The order is fixed: own tile first, then columns left to right and,
    /// within a column, rows top to bottom. Interaction lookup depends on it.
    pub fn with_surroundings(self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(9);
        positions.push(self);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                positions.push(Position::new(self.x + dx, self.y + dy));
            }
        }
        positions
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// The four directions the player can walk in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a unit position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use redemu::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

/// Tunable gameplay parameters.
///
/// All pacing values are in seconds and are compared against the `now`
/// timestamps handed to the controller, never against the wall clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Visible map width in tiles
    pub viewport_width: i32,
    /// Visible map height in tiles
    pub viewport_height: i32,
    /// Maximum rendered width of a textbox line in pixels
    pub textbox_wrap_width: f32,
    /// Encounter probability per step on an ordinary encounter tile
    pub encounter_rate: f64,
    /// Encounter probability per step on tall grass
    pub tall_grass_encounter_rate: f64,
    /// Attack rolls add a uniform offset in `-variance..=variance`
    pub damage_variance: i32,
    /// Smallest post-battle recovery
    pub recovery_min: u32,
    /// Largest post-battle recovery
    pub recovery_max: u32,
    /// Battle menu is locked for this long after every new battle message
    pub input_gate: f64,
    /// Pause between the player's hit and the enemy's reply
    pub enemy_turn_delay: f64,
    /// Pause between a faint and the end of the battle
    pub battle_end_delay: f64,
    /// Pause between running away and the end of the battle
    pub flee_delay: f64,
    /// Map the session starts on
    pub start_map: String,
    /// Tile the player starts on
    pub start_position: Position,
    /// Species of the player's creature
    pub starter: String,
}

impl GameConfig {
    /// Creates the default configuration used by the game.
    ///
    /// # Examples
    ///
    /// ```
    /// use redemu::GameConfig;
    ///
    /// let config = GameConfig::new();
    /// assert_eq!(config.viewport_width, 30);
    /// assert!(config.tall_grass_encounter_rate > config.encounter_rate);
    /// ```
    pub fn new() -> Self {
        Self {
            viewport_width: crate::config::SCREEN_WIDTH / crate::config::TILE_SIZE,
            viewport_height: (crate::config::SCREEN_HEIGHT - crate::config::TEXT_BOX_HEIGHT)
                / crate::config::TILE_SIZE,
            textbox_wrap_width: crate::config::TEXTBOX_WRAP_WIDTH,
            encounter_rate: 0.10,
            tall_grass_encounter_rate: 0.20,
            damage_variance: 2,
            recovery_min: 3,
            recovery_max: 8,
            input_gate: 1.0,
            enemy_turn_delay: 1.5,
            battle_end_delay: 2.0,
            flee_delay: 1.5,
            start_map: "pallet_town".to_string(),
            start_position: Position::new(10, 5),
            starter: "KITTENPUNCH".to_string(),
        }
    }

    /// Creates a configuration for testing with deterministic damage.
    pub fn for_testing() -> Self {
        Self {
            damage_variance: 0,
            ..Self::new()
        }
    }

    /// Parses a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> RedEmuResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: &Path) -> RedEmuResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks that the settings describe a playable session.
    pub fn validate(&self) -> RedEmuResult<()> {
        if self.viewport_width <= 0 || self.viewport_height <= 0 {
            return Err(RedEmuError::InvalidState(
                "viewport must be at least one tile".to_string(),
            ));
        }
        if self.recovery_min > self.recovery_max {
            return Err(RedEmuError::InvalidState(format!(
                "recovery range {}..={} is empty",
                self.recovery_min, self.recovery_max
            )));
        }
        if self.damage_variance < 0 {
            return Err(RedEmuError::InvalidState(
                "damage variance cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
