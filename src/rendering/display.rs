//! # Display Management
//!
//! Paints the overworld, the textbox and the battle screen using macroquad.
//! The display only reads the controller; it never mutates game state.

use crate::config::{
    BATTLE_MENU_WIDTH, PLAYER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, TEXTBOX_PADDING, TILE_SIZE,
};
use crate::game::{GameController, GameMode, Tile};
use crate::rendering::ui::{self, UI};
use macroquad::prelude::*;

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Tile size in pixels
    pub tile_size: f32,
    /// Textbox layout and drawing
    pub ui: UI,
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadDisplay {
    /// Creates a display manager.
    pub fn new() -> Self {
        Self {
            tile_size: TILE_SIZE as f32,
            ui: UI::new(),
        }
    }

    /// Renders the complete screen for the current mode.
    pub fn render_game(&self, game: &GameController, now: f64) {
        clear_background(BLACK);

        match game.mode() {
            GameMode::Overworld | GameMode::Textbox => {
                self.render_map(game);
                self.render_player(game);
                self.render_textbox(game);
            }
            GameMode::Battle => self.render_battle(game, now),
        }
    }

    /// Renders the visible window of the current map.
    fn render_map(&self, game: &GameController) {
        let map = game.map();
        let camera = game.overworld.camera;

        // One extra row and column so partially visible tiles are drawn
        let end_x = (camera.x + camera.view_width + 1).min(map.width());
        let end_y = (camera.y + camera.view_height + 1).min(map.height());

        for (row_index, row) in map.rows().iter().enumerate().take(end_y as usize).skip(camera.y as usize) {
            for (col_index, tile) in row.iter().enumerate().take(end_x as usize).skip(camera.x as usize) {
                let x = (col_index as i32 - camera.x) as f32 * self.tile_size;
                let y = (row_index as i32 - camera.y) as f32 * self.tile_size;
                if y < self.ui.textbox_top() {
                    self.render_tile(*tile, x, y);
                }
            }
        }
    }

    /// Renders a tile at the given screen position.
    fn render_tile(&self, tile: Tile, x: f32, y: f32) {
        let size = self.tile_size;
        match tile {
            Tile::Path | Tile::NpcBlock => draw_rectangle(x, y, size, size, ui::PATH_BROWN),
            Tile::Grass => draw_rectangle(x, y, size, size, ui::GRASS_GREEN),
            Tile::TallGrass => draw_rectangle(x, y, size, size, ui::TALL_GRASS_GREEN),
            Tile::Wall => {
                draw_rectangle(x, y, size, size, ui::WALL_GREY);
                draw_rectangle_lines(x, y, size, size, 1.0, BLACK);
            }
            Tile::Water => {
                draw_rectangle(x, y, size, size, ui::WATER_BLUE);
                let third = size / 3.0;
                draw_line(x + 2.0, y + third, x + size - 2.0, y + third, 1.0, WHITE);
                draw_line(x + 4.0, y + 2.0 * third, x + size - 4.0, y + 2.0 * third, 1.0, WHITE);
            }
            Tile::Roof => {
                draw_rectangle(x, y, size, size, ui::ROOF_RED);
                draw_rectangle_lines(x, y, size, size, 1.0, BLACK);
            }
            Tile::BuildingWall => {
                draw_rectangle(x, y, size, size, ui::BUILDING_WALL);
                draw_rectangle_lines(x, y, size, size, 1.0, ui::WALL_GREY);
            }
            Tile::Door => {
                draw_rectangle(x, y, size, size, ui::PATH_BROWN);
                draw_rectangle_lines(x + 2.0, y + 2.0, size - 4.0, size - 4.0, 2.0, BLACK);
                draw_circle(x + size - 4.0, y + size / 2.0, 2.0, BLACK);
            }
            Tile::Sign => {
                draw_rectangle(x + size / 3.0, y + size / 2.0, size / 3.0, size / 2.0, ui::PATH_BROWN);
                draw_rectangle(x, y, size, size / 2.0, ui::LIGHT_YELLOW);
                draw_rectangle_lines(x, y, size, size / 2.0, 1.0, ui::PATH_BROWN);
            }
            Tile::TreeTrunk => {
                draw_rectangle(x, y, size, size, ui::GRASS_GREEN);
                draw_rectangle(x + size / 3.0, y, size / 3.0, size, ui::PATH_BROWN);
            }
            Tile::TreeLeaves => {
                draw_rectangle(x, y, size, size, ui::GRASS_GREEN);
                draw_circle(x + size / 2.0, y + size / 2.0, size / 2.0, ui::TALL_GRASS_GREEN);
            }
            Tile::Flower => {
                draw_rectangle(x, y, size, size, ui::GRASS_GREEN);
                draw_circle(x + size / 4.0, y + size / 4.0, 2.0, ui::FLOWER_PINK);
                draw_circle(x + 3.0 * size / 4.0, y + size / 2.0, 2.0, YELLOW);
                draw_circle(x + size / 3.0, y + 3.0 * size / 4.0, 2.0, ui::FLOWER_PINK);
            }
        }
    }

    /// Renders the player marker if it is on screen.
    fn render_player(&self, game: &GameController) {
        let camera = game.overworld.camera;
        let player = game.player_position();
        let inset = (TILE_SIZE - PLAYER_SIZE) as f32 / 2.0;
        let x = (player.x - camera.x) as f32 * self.tile_size + inset;
        let y = (player.y - camera.y) as f32 * self.tile_size + inset;
        let size = PLAYER_SIZE as f32;

        if y < self.ui.textbox_top() && y + size > 0.0 && x < SCREEN_WIDTH as f32 && x + size > 0.0 {
            draw_rectangle(x, y, size, size, RED);
            draw_rectangle_lines(x, y, size, size, 1.0, BLACK);
        }
    }

    /// Renders the textbox strip and the revealed lines of the active message.
    fn render_textbox(&self, game: &GameController) {
        self.ui.draw_textbox_frame();

        if let Some(active) = game.textbox.active() {
            self.ui.draw_textbox_lines(active.visible_lines());
            if active.is_fully_revealed() {
                self.ui.draw_continue_prompt();
            }
        }
    }

    /// Renders the battle screen.
    fn render_battle(&self, game: &GameController, now: f64) {
        let Some(battle) = game.battle.battle() else {
            return;
        };
        let name_size = self.ui.font_size + 6.0;
        let screen_w = SCREEN_WIDTH as f32;
        let screen_h = SCREEN_HEIGHT as f32;

        // Wild creature, top right
        let enemy = &battle.enemy;
        draw_rectangle(screen_w - 120.0, 50.0, 80.0, 80.0, ui::rgb(enemy.color));
        draw_rectangle_lines(screen_w - 120.0, 50.0, 80.0, 80.0, 2.0, WHITE);
        draw_text(&enemy.name, screen_w - 150.0, 36.0, name_size, WHITE);
        draw_text(
            &format!("HP: {}/{}", enemy.hp, enemy.max_hp),
            screen_w - 150.0,
            56.0,
            self.ui.font_size,
            WHITE,
        );

        // Player's creature, bottom left
        let party = &game.party;
        draw_rectangle(40.0, screen_h - 200.0, 80.0, 80.0, ui::rgb(party.color));
        draw_rectangle_lines(40.0, screen_h - 200.0, 80.0, 80.0, 2.0, WHITE);
        draw_text(&party.name, 30.0, screen_h - 214.0, name_size, WHITE);
        draw_text(
            &format!("HP: {}/{}", party.hp, party.max_hp),
            30.0,
            screen_h - 204.0 + self.ui.font_size,
            self.ui.font_size,
            WHITE,
        );

        self.ui.draw_textbox_frame();
        self.ui.draw_textbox_lines(&game.battle_message_lines());
        if game.battle_menu_open(now) {
            let x = screen_w - TEXTBOX_PADDING - BATTLE_MENU_WIDTH + 10.0;
            let top = self.ui.textbox_top();
            draw_text("1. FIGHT", x, top + 20.0 + self.ui.font_size, self.ui.font_size, BLACK);
            draw_text(
                "2. RUN",
                x,
                top + 25.0 + 2.0 * self.ui.font_size,
                self.ui.font_size,
                BLACK,
            );
        }
    }
}
