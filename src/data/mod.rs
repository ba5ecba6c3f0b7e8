//! # Built-in Content
//!
//! The maps, interactions and species that ship with the game, stored as
//! JSON assets and compiled into the binary.

use crate::{
    Direction, Interaction, InteractionKind, Map, MapConnection, Position, RedEmuResult, Species,
    SpeciesTable, Tile, World,
};
use serde::Deserialize;

const PALLET_TOWN: &str = include_str!("../../assets/pallet_town.json");
const SPECIES: &str = include_str!("../../assets/species.json");

/// On-disk description of one map.
#[derive(Debug, Deserialize)]
pub struct MapAsset {
    pub id: String,
    pub tiles: Vec<Vec<Tile>>,
    #[serde(default)]
    pub connections: Vec<ConnectionAsset>,
    #[serde(default)]
    pub encounter_tiles: Vec<Tile>,
    #[serde(default)]
    pub interactions: Vec<InteractionAsset>,
}

/// On-disk description of an edge connection.
#[derive(Debug, Deserialize)]
pub struct ConnectionAsset {
    pub edge: Direction,
    pub target: String,
    pub entry: Position,
}

/// On-disk description of an interaction. `kind` may be left out and inferred.
#[derive(Debug, Deserialize)]
pub struct InteractionAsset {
    pub x: i32,
    pub y: i32,
    pub kind: Option<InteractionKind>,
    pub message: String,
}

impl MapAsset {
    /// Parses a map asset from JSON.
    pub fn from_json(json: &str) -> RedEmuResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Registers the map template and its interactions with a world.
    pub fn install(self, world: &mut World) -> RedEmuResult<()> {
        let mut map = Map::new(self.id, self.tiles)?.with_encounter_tiles(self.encounter_tiles);
        for connection in self.connections {
            map = map.with_connection(
                connection.edge,
                MapConnection {
                    target: connection.target,
                    entry: connection.entry,
                },
            );
        }

        for interaction in self.interactions {
            let pos = Position::new(interaction.x, interaction.y);
            match interaction.kind {
                Some(kind) => world.interactions.register(
                    &map.id,
                    pos,
                    Interaction {
                        kind,
                        message: interaction.message,
                    },
                ),
                None => {
                    world
                        .interactions
                        .register_inferred(&map.id, pos, &interaction.message);
                }
            }
        }

        world.add_map(map);
        Ok(())
    }
}

/// Builds the world with every built-in map.
pub fn builtin_world() -> RedEmuResult<World> {
    let mut world = World::new();
    MapAsset::from_json(PALLET_TOWN)?.install(&mut world)?;
    Ok(world)
}

/// Builds the built-in species table.
pub fn builtin_species() -> RedEmuResult<SpeciesTable> {
    let species: Vec<Species> = serde_json::from_str(SPECIES)?;
    SpeciesTable::new(species)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RedEmuError;

    #[test]
    fn test_pallet_town_loads() {
        let world = builtin_world().unwrap();
        let map = world.load("pallet_town").unwrap();

        assert_eq!(map.width(), 30);
        assert_eq!(map.height(), 20);
        assert!(map.is_encounter_tile(Tile::Grass));
        assert!(map.is_encounter_tile(Tile::TallGrass));
        assert!(!map.is_encounter_tile(Tile::Path));
        assert_eq!(
            map.connections.get(&Direction::North).map(|c| c.target.as_str()),
            Some("route_1")
        );
        // Padding rows are solid wall
        assert!(map.rows()[19].iter().all(|t| *t == Tile::Wall));
    }

    #[test]
    fn test_pallet_town_interaction_tiles() {
        let world = builtin_world().unwrap();
        let map = world.load("pallet_town").unwrap();

        assert_eq!(world.interactions.len(), 5);
        assert_eq!(map.tile_at(Position::new(4, 1)), Some(Tile::Door));
        assert_eq!(map.tile_at(Position::new(4, 4)), Some(Tile::Door));
        assert_eq!(map.tile_at(Position::new(12, 1)), Some(Tile::Sign));
        assert_eq!(map.tile_at(Position::new(16, 2)), Some(Tile::Sign));
        // Was a path tile before the sign was placed
        assert_eq!(map.tile_at(Position::new(7, 2)), Some(Tile::Sign));
    }

    #[test]
    fn test_builtin_species() {
        let table = builtin_species().unwrap();
        assert_eq!(table.all().len(), 3);
        let kitten = table.get("KITTENPUNCH").unwrap();
        assert_eq!((kitten.max_hp, kitten.attack, kitten.defense), (30, 8, 5));
        assert!(table.get("MISSINGNO").is_none());
    }

    #[test]
    fn test_untagged_interactions_are_inferred() {
        let json = r#"{
            "id": "route_1",
            "tiles": [[0, 0, 0], [0, 0, 0]],
            "interactions": [
                { "x": 0, "y": 0, "message": "Old house door" },
                { "x": 1, "y": 0, "message": "ROUTE 1" },
                { "x": 2, "y": 0, "message": "Mystery" }
            ]
        }"#;
        let mut world = World::new();
        MapAsset::from_json(json).unwrap().install(&mut world).unwrap();
        let map = world.load("route_1").unwrap();

        assert_eq!(map.tile_at(Position::new(0, 0)), Some(Tile::Door));
        assert_eq!(map.tile_at(Position::new(1, 0)), Some(Tile::Sign));
        assert_eq!(map.tile_at(Position::new(2, 0)), Some(Tile::Path));
        assert_eq!(world.interactions.len(), 2);
    }

    #[test]
    fn test_bad_tile_code_is_serde_error() {
        let json = r#"{ "id": "bad", "tiles": [[0, 99]] }"#;
        assert!(matches!(
            MapAsset::from_json(json),
            Err(RedEmuError::Serde(_))
        ));
    }

    #[test]
    fn test_ragged_asset_rejected() {
        let json = r#"{ "id": "ragged", "tiles": [[0, 0], [0]] }"#;
        let mut world = World::new();
        let result = MapAsset::from_json(json).unwrap().install(&mut world);
        assert!(matches!(result, Err(RedEmuError::InvalidMap(_))));
        assert!(!world.has_map("ragged"));
    }
}
