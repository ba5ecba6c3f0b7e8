//! # Overworld
//!
//! Player movement on the tile grid and interaction lookup.

use crate::{Camera, Direction, GameConfig, InteractionRegistry, Map, Position, Tile};
use log::{debug, trace};
use rand::Rng;

/// Result of one movement input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The step would leave the map
    OutOfBounds,
    /// The target tile cannot be walked on
    Blocked(Tile),
    /// The player moved; `encounter` is the result of the encounter roll
    Moved { tile: Tile, encounter: bool },
}

/// The player's whereabouts on the overworld.
#[derive(Debug, Clone, PartialEq)]
pub struct Overworld {
    /// Player tile position on the current map
    pub player: Position,
    /// Visible window
    pub camera: Camera,
    encounter_rate: f64,
    tall_grass_encounter_rate: f64,
}

impl Overworld {
    /// Places the player on a map and centres the camera.
    pub fn new(map: &Map, player: Position, config: &GameConfig) -> Self {
        let mut camera = Camera::new(config.viewport_width, config.viewport_height);
        camera.recenter(map, player);
        Self {
            player,
            camera,
            encounter_rate: config.encounter_rate,
            tall_grass_encounter_rate: config.tall_grass_encounter_rate,
        }
    }

    /// Encounter probability for one step onto `tile`.
    pub fn encounter_chance(&self, map: &Map, tile: Tile) -> f64 {
        if !map.is_encounter_tile(tile) {
            0.0
        } else if tile == Tile::TallGrass {
            self.tall_grass_encounter_rate
        } else {
            self.encounter_rate
        }
    }

    /// Attempts a single step.
    ///
    /// A committed step re-centres the camera and rolls for an encounter once.
    ///
    /// # Examples
    ///
    /// ```
    /// use redemu::{Direction, GameConfig, Map, MoveOutcome, Overworld, Position, Tile};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let map = Map::new("yard", vec![vec![Tile::Path, Tile::Path, Tile::Wall]]).unwrap();
    /// let mut overworld = Overworld::new(&map, Position::new(0, 0), &GameConfig::default());
    /// let mut rng = StdRng::seed_from_u64(1);
    ///
    /// let outcome = overworld.try_move(&map, Direction::East, &mut rng);
    /// assert_eq!(outcome, MoveOutcome::Moved { tile: Tile::Path, encounter: false });
    /// assert_eq!(overworld.try_move(&map, Direction::East, &mut rng), MoveOutcome::Blocked(Tile::Wall));
    /// assert_eq!(overworld.try_move(&map, Direction::North, &mut rng), MoveOutcome::OutOfBounds);
    /// assert_eq!(overworld.player, Position::new(1, 0));
    /// ```
    pub fn try_move<R: Rng>(&mut self, map: &Map, direction: Direction, rng: &mut R) -> MoveOutcome {
        let target = self.player + direction.to_delta();
        let Some(tile) = map.tile_at(target) else {
            if let Some(connection) = map.connections.get(&direction) {
                debug!(
                    "Edge {:?} of {} leads to {}, but map transitions are not supported",
                    direction, map.id, connection.target
                );
            }
            return MoveOutcome::OutOfBounds;
        };

        if tile.is_impassable() {
            trace!("Blocked by {} at ({}, {})", tile.name(), target.x, target.y);
            return MoveOutcome::Blocked(tile);
        }

        self.player = target;
        self.camera.recenter(map, target);

        let chance = self.encounter_chance(map, tile);
        let encounter = chance > 0.0 && rng.gen::<f64>() < chance;
        MoveOutcome::Moved { tile, encounter }
    }

    /// Finds the interaction the player can trigger from where they stand.
    ///
    /// Checks the player's tile, then the 8 neighbours in a fixed order, and
    /// returns the first registered message whose tile is currently a door or sign.
    pub fn find_interaction<'a>(
        &self,
        map: &Map,
        interactions: &'a InteractionRegistry,
    ) -> Option<&'a str> {
        self.player.with_surroundings().into_iter().find_map(|pos| {
            let interaction = interactions.get(&map.id, pos)?;
            let tile = map.tile_at(pos)?;
            tile.is_interactive().then_some(interaction.message.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Interaction, InteractionKind, MapConnection};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> Map {
        use Tile::*;
        Map::new(
            "field",
            vec![
                vec![Wall, Wall, Wall, Wall, Wall],
                vec![Wall, Path, Path, Grass, Wall],
                vec![Wall, Path, Door, TallGrass, Wall],
                vec![Wall, Water, Sign, Path, Wall],
                vec![Wall, Wall, Wall, Wall, Wall],
            ],
        )
        .unwrap()
        .with_encounter_tiles([Grass, TallGrass])
    }

    fn sign(message: &str) -> Interaction {
        Interaction {
            kind: InteractionKind::Sign,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_blocked_by_wall_and_water() {
        let map = field();
        let mut overworld = Overworld::new(&map, Position::new(1, 2), &GameConfig::default());
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(
            overworld.try_move(&map, Direction::West, &mut rng),
            MoveOutcome::Blocked(Tile::Wall)
        );
        assert_eq!(
            overworld.try_move(&map, Direction::South, &mut rng),
            MoveOutcome::Blocked(Tile::Water)
        );
        assert_eq!(overworld.player, Position::new(1, 2));
    }

    #[test]
    fn test_door_and_sign_are_walkable() {
        let map = field();
        let mut overworld = Overworld::new(&map, Position::new(1, 2), &GameConfig::default());
        let mut rng = StdRng::seed_from_u64(5);

        assert!(matches!(
            overworld.try_move(&map, Direction::East, &mut rng),
            MoveOutcome::Moved { tile: Tile::Door, encounter: false }
        ));
        assert!(matches!(
            overworld.try_move(&map, Direction::South, &mut rng),
            MoveOutcome::Moved { tile: Tile::Sign, encounter: false }
        ));
    }

    #[test]
    fn test_refused_moves_draw_nothing() {
        let map = field();
        let mut overworld = Overworld::new(&map, Position::new(1, 2), &GameConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        let mut reference = rng.clone();

        overworld.try_move(&map, Direction::West, &mut rng);
        overworld.try_move(&map, Direction::South, &mut rng);
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());

        let strip = Map::new("strip", vec![vec![Tile::Grass; 2]])
            .unwrap()
            .with_encounter_tiles([Tile::Grass]);
        let mut overworld = Overworld::new(&strip, Position::new(0, 0), &GameConfig::default());
        assert_eq!(
            overworld.try_move(&strip, Direction::North, &mut rng),
            MoveOutcome::OutOfBounds
        );
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    fn test_committed_steps_draw_once_per_encounter_tile() {
        let map = field();
        let mut overworld = Overworld::new(&map, Position::new(1, 1), &GameConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        let mut reference = rng.clone();

        // Path consumes nothing
        overworld.try_move(&map, Direction::East, &mut rng);
        assert_eq!(overworld.player, Position::new(2, 1));

        // Grass consumes exactly one roll
        overworld.try_move(&map, Direction::East, &mut rng);
        assert_eq!(overworld.player, Position::new(3, 1));
        let _ = reference.gen::<f64>();
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    fn test_encounter_chance_by_tile() {
        let map = field();
        let overworld = Overworld::new(&map, Position::new(1, 1), &GameConfig::default());
        assert_eq!(overworld.encounter_chance(&map, Tile::Path), 0.0);
        assert_eq!(overworld.encounter_chance(&map, Tile::Grass), 0.10);
        assert_eq!(overworld.encounter_chance(&map, Tile::TallGrass), 0.20);
        assert_eq!(overworld.encounter_chance(&map, Tile::Flower), 0.0);
    }

    #[test]
    fn test_edge_connection_is_not_traversed() {
        let map = Map::new("strip", vec![vec![Tile::Path; 3]])
            .unwrap()
            .with_connection(
                Direction::North,
                MapConnection {
                    target: "route_1".to_string(),
                    entry: Position::new(10, 18),
                },
            );
        let mut overworld = Overworld::new(&map, Position::new(1, 0), &GameConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            overworld.try_move(&map, Direction::North, &mut rng),
            MoveOutcome::OutOfBounds
        );
        assert_eq!(overworld.player, Position::new(1, 0));
    }

    #[test]
    fn test_find_interaction_requires_interactive_tile() {
        let map = field();
        let mut interactions = InteractionRegistry::new();
        // Registered on plain path: never fires
        interactions.register("field", Position::new(1, 1), sign("Hidden"));
        interactions.register("field", Position::new(2, 3), sign("Welcome!"));

        let overworld = Overworld::new(&map, Position::new(1, 2), &GameConfig::default());
        assert_eq!(
            overworld.find_interaction(&map, &interactions),
            Some("Welcome!")
        );

        let far = Overworld::new(&map, Position::new(3, 1), &GameConfig::default());
        assert_eq!(far.find_interaction(&map, &interactions), None);
    }

    #[test]
    fn test_find_interaction_prefers_own_tile_then_fixed_order() {
        let map = field();
        let mut interactions = InteractionRegistry::new();
        interactions.register("field", Position::new(2, 3), sign("Sign below"));
        interactions.register("field", Position::new(2, 2), sign("Door here"));

        let on_door = Overworld::new(&map, Position::new(2, 2), &GameConfig::default());
        assert_eq!(
            on_door.find_interaction(&map, &interactions),
            Some("Door here")
        );

        // Seen from (3, 3), the neighbour (2, 2) is checked before (2, 3)
        let beside = Overworld::new(&map, Position::new(3, 3), &GameConfig::default());
        assert_eq!(
            beside.find_interaction(&map, &interactions),
            Some("Door here")
        );
    }
}
