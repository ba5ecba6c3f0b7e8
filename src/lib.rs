//! # RedEmu
//!
//! A minimal single-player tile-based RPG: walk a town, read signs, knock on
//! doors, and fight wild creatures in the tall grass.
//!
//! ## Architecture Overview
//!
//! The engine is a single-threaded, tick-driven state machine:
//!
//! - **World**: map templates, tile kinds and scripted point interactions
//! - **Overworld**: movement, collision, camera and random encounters
//! - **Textbox**: word-wrapped, page-by-page message presentation
//! - **Battle**: turn-based combat with timed, deferred turn changes
//! - **Controller**: the Overworld / Textbox / Battle mode machine that owns the session
//!
//! Rendering and keyboard input live in their own modules and only read or
//! feed the controller. Time is always passed in explicitly, so the whole
//! engine runs deterministically under test.

pub mod data;
pub mod game;
pub mod input;
pub mod rendering;
pub mod scenes;

// Core module re-exports
pub use game::*;
pub use input::*;
pub use rendering::*;
pub use scenes::*;

/// Core error type for the RedEmu engine.
#[derive(thiserror::Error, Debug)]
pub enum RedEmuError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A map grid is empty or not rectangular
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    /// No map template with this id
    #[error("Unknown map: {0}")]
    UnknownMap(String),

    /// Species lookup failed
    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    /// Game state or configuration is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the RedEmu codebase.
pub type RedEmuResult<T> = Result<T, RedEmuError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Screen geometry constants.
pub mod config {
    /// Window width in pixels
    pub const SCREEN_WIDTH: i32 = 480;

    /// Window height in pixels
    pub const SCREEN_HEIGHT: i32 = 320;

    /// Tile edge length in pixels
    pub const TILE_SIZE: i32 = 16;

    /// Player marker edge length in pixels
    pub const PLAYER_SIZE: i32 = 12;

    /// Height of the textbox strip at the bottom of the screen
    pub const TEXT_BOX_HEIGHT: i32 = 80;

    /// Textbox font size
    pub const FONT_SIZE: u16 = 18;

    /// Horizontal padding inside the textbox, per side
    pub const TEXTBOX_PADDING: f32 = 15.0;

    /// Width available to a textbox line
    pub const TEXTBOX_WRAP_WIDTH: f32 = SCREEN_WIDTH as f32 - 2.0 * TEXTBOX_PADDING;

    /// Column kept free for the battle menu on the right of the textbox
    pub const BATTLE_MENU_WIDTH: f32 = 110.0;
}
