//! # Input Module
//!
//! Keyboard handling: turns macroquad key presses into discrete player inputs.

use crate::game::{BattleAction, Direction};
use macroquad::prelude::*;

/// Player input types dispatched to the game controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Walk one tile
    Move(Direction),
    /// Interact, or advance the textbox
    Confirm,
    /// Battle menu choice
    Battle(BattleAction),
    /// Quit the game
    Quit,
}

/// Input handler for processing player commands.
pub struct InputHandler {
    bindings: Vec<(KeyCode, PlayerInput)>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates an input handler with the default key bindings.
    ///
    /// Arrow keys move, Z confirms, 1 and 2 pick FIGHT and RUN, Escape quits.
    pub fn new() -> Self {
        Self {
            bindings: vec![
                (KeyCode::Escape, PlayerInput::Quit),
                (KeyCode::Up, PlayerInput::Move(Direction::North)),
                (KeyCode::Down, PlayerInput::Move(Direction::South)),
                (KeyCode::Left, PlayerInput::Move(Direction::West)),
                (KeyCode::Right, PlayerInput::Move(Direction::East)),
                (KeyCode::Z, PlayerInput::Confirm),
                (KeyCode::Key1, PlayerInput::Battle(BattleAction::Fight)),
                (KeyCode::Key2, PlayerInput::Battle(BattleAction::Run)),
            ],
        }
    }

    /// Maps a single key to its input, if bound.
    pub fn input_for_key(&self, key: KeyCode) -> Option<PlayerInput> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, input)| *input)
    }

    /// Drains every key pressed since the last frame, in binding order.
    pub fn drain_inputs(&self) -> Vec<PlayerInput> {
        self.bindings
            .iter()
            .filter(|(key, _)| is_key_pressed(*key))
            .map(|(_, input)| *input)
            .collect()
    }
}
