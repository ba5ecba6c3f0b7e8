//! # Scene Management System
//!
//! Owns the game controller together with its display and input handler,
//! and drives the fixed per-frame loop: drain input, dispatch it, fire any
//! due triggers, then draw.

use crate::{GameController, GameEvent, InputHandler, MacroquadDisplay, PlayerInput, RedEmuResult};
use macroquad::prelude::{get_time, next_frame};

/// The main scene manager that runs a game session.
pub struct SceneManager {
    game: GameController,
    display: MacroquadDisplay,
    input_handler: InputHandler,
}

impl SceneManager {
    /// Creates a scene manager for the given session.
    pub fn new(game: GameController, input_handler: InputHandler) -> Self {
        Self {
            game,
            display: MacroquadDisplay::new(),
            input_handler,
        }
    }

    /// Read-only access to the session.
    pub fn game(&self) -> &GameController {
        &self.game
    }

    /// Runs the main loop until the player quits.
    pub async fn run(&mut self) -> RedEmuResult<()> {
        log::info!("Entering main loop in {:?} mode", self.game.mode());

        loop {
            if self.update_frame(get_time()) {
                break;
            }
            next_frame().await;
        }

        let stats = &self.game.statistics;
        log::info!(
            "Session over: {} steps, {} encounters ({} won, {} lost, {} fled), {} messages",
            stats.steps_taken,
            stats.encounters,
            stats.victories,
            stats.defeats,
            stats.escapes,
            stats.messages_shown
        );
        Ok(())
    }

    /// Runs one frame. Returns true if exit is requested.
    fn update_frame(&mut self, now: f64) -> bool {
        for input in self.input_handler.drain_inputs() {
            if input == PlayerInput::Quit {
                log::info!("Player quit the game");
                return true;
            }
            let events = self.game.handle_input(input, now);
            Self::log_events(&events);
        }

        let events = self.game.update(now);
        Self::log_events(&events);

        self.display.render_game(&self.game, now);
        false
    }

    fn log_events(events: &[GameEvent]) {
        for event in events {
            log::trace!("{:?}", event);
        }
    }
}
