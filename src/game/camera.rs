//! # Camera
//!
//! Derives the visible tile window from the player position.

use crate::{Map, Position};
use serde::{Deserialize, Serialize};

/// Top-left visible tile plus the viewport size in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_width: i32,
    pub view_height: i32,
}

impl Camera {
    /// Creates a camera at the map origin.
    pub fn new(view_width: i32, view_height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            view_width,
            view_height,
        }
    }

    /// Centres the window on the player, clamped to the map.
    ///
    /// Each axis is clamped to `0..=map_size - view_size`. A map narrower than
    /// the viewport pins that axis to 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use redemu::{Camera, Map, Position, Tile};
    ///
    /// let map = Map::new("field", vec![vec![Tile::Grass; 40]; 30]).unwrap();
    /// let mut camera = Camera::new(30, 15);
    ///
    /// assert_eq!(camera.recenter(&map, Position::new(20, 15)), (5, 8));
    /// assert_eq!(camera.recenter(&map, Position::new(1, 1)), (0, 0));
    /// assert_eq!(camera.recenter(&map, Position::new(39, 29)), (10, 15));
    /// ```
    pub fn recenter(&mut self, map: &Map, player: Position) -> (i32, i32) {
        self.x = clamp_axis(
            player.x - self.view_width / 2,
            map.width() - self.view_width,
        );
        self.y = clamp_axis(
            player.y - self.view_height / 2,
            map.height() - self.view_height,
        );
        (self.x, self.y)
    }

    /// Returns true if the tile falls inside the visible window.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.y >= self.y
            && pos.x < self.x + self.view_width
            && pos.y < self.y + self.view_height
    }
}

fn clamp_axis(target: i32, ceiling: i32) -> i32 {
    target.min(ceiling).max(0)
}
