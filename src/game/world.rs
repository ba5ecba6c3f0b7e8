//! # World Module
//!
//! Tile grids, map templates, and the registry of scripted point interactions.
//!
//! Map templates are registered once and never mutated. Every call to
//! [`World::load`] hands out a fresh copy with the interaction tiles stamped in,
//! so the running session can never corrupt a template.

use crate::{Direction, Position, RedEmuError, RedEmuResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Terrain or object occupying one grid cell.
///
/// The numeric codes are the on-disk representation used by map assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tile {
    Path,
    Grass,
    Wall,
    Water,
    NpcBlock,
    Roof,
    BuildingWall,
    Door,
    Sign,
    TallGrass,
    TreeTrunk,
    TreeLeaves,
    Flower,
}

impl Tile {
    /// Returns true if the player can never stand on this tile.
    pub fn is_impassable(self) -> bool {
        matches!(
            self,
            Tile::Wall
                | Tile::Water
                | Tile::Roof
                | Tile::BuildingWall
                | Tile::TreeTrunk
                | Tile::TreeLeaves
        )
    }

    /// Returns true if an interaction registered on this tile can fire.
    pub fn is_interactive(self) -> bool {
        matches!(self, Tile::Door | Tile::Sign)
    }

    /// Human readable tile name.
    pub fn name(self) -> &'static str {
        match self {
            Tile::Path => "Path",
            Tile::Grass => "Grass",
            Tile::Wall => "Wall",
            Tile::Water => "Water",
            Tile::NpcBlock => "NPC",
            Tile::Roof => "Roof",
            Tile::BuildingWall => "Building Wall",
            Tile::Door => "Door",
            Tile::Sign => "Sign",
            Tile::TallGrass => "Tall Grass",
            Tile::TreeTrunk => "Tree Trunk",
            Tile::TreeLeaves => "Tree Leaves",
            Tile::Flower => "Flowers",
        }
    }
}

impl TryFrom<u8> for Tile {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Tile::Path,
            1 => Tile::Grass,
            2 => Tile::Wall,
            3 => Tile::Water,
            4 => Tile::NpcBlock,
            5 => Tile::Roof,
            6 => Tile::BuildingWall,
            7 => Tile::Door,
            8 => Tile::Sign,
            9 => Tile::TallGrass,
            10 => Tile::TreeTrunk,
            11 => Tile::TreeLeaves,
            12 => Tile::Flower,
            other => return Err(format!("unknown tile code {}", other)),
        })
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> u8 {
        match tile {
            Tile::Path => 0,
            Tile::Grass => 1,
            Tile::Wall => 2,
            Tile::Water => 3,
            Tile::NpcBlock => 4,
            Tile::Roof => 5,
            Tile::BuildingWall => 6,
            Tile::Door => 7,
            Tile::Sign => 8,
            Tile::TallGrass => 9,
            Tile::TreeTrunk => 10,
            Tile::TreeLeaves => 11,
            Tile::Flower => 12,
        }
    }
}

/// A link from one side of a map to another map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConnection {
    /// Map on the other side
    pub target: String,
    /// Where the player appears on the target map
    pub entry: Position,
}

/// A rectangular tile grid with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    /// Map identifier
    pub id: String,
    tiles: Vec<Vec<Tile>>,
    width: i32,
    height: i32,
    /// Edge connections to neighbouring maps
    pub connections: HashMap<Direction, MapConnection>,
    /// Tile kinds that can start a random encounter
    pub encounter_tiles: HashSet<Tile>,
}

impl Map {
    /// Creates a map, rejecting empty or ragged grids.
    ///
    /// # Examples
    ///
    /// ```
    /// use redemu::{Map, Tile};
    ///
    /// let map = Map::new("yard", vec![vec![Tile::Path, Tile::Grass]]).unwrap();
    /// assert_eq!(map.width(), 2);
    /// assert_eq!(map.height(), 1);
    ///
    /// let ragged = vec![vec![Tile::Path, Tile::Grass], vec![Tile::Path]];
    /// assert!(Map::new("broken", ragged).is_err());
    /// ```
    pub fn new(id: impl Into<String>, tiles: Vec<Vec<Tile>>) -> RedEmuResult<Self> {
        let id = id.into();
        let width = tiles.first().map(|row| row.len()).unwrap_or(0);
        if width == 0 {
            return Err(RedEmuError::InvalidMap(format!("map '{}' is empty", id)));
        }
        if let Some(row) = tiles.iter().position(|row| row.len() != width) {
            return Err(RedEmuError::InvalidMap(format!(
                "map '{}' row {} has {} tiles, expected {}",
                id,
                row,
                tiles[row].len(),
                width
            )));
        }

        Ok(Self {
            id,
            height: tiles.len() as i32,
            width: width as i32,
            tiles,
            connections: HashMap::new(),
            encounter_tiles: HashSet::new(),
        })
    }

    /// Sets the encounter-eligible tile kinds.
    pub fn with_encounter_tiles(mut self, tiles: impl IntoIterator<Item = Tile>) -> Self {
        self.encounter_tiles = tiles.into_iter().collect();
        self
    }

    /// Adds a connection on the given edge.
    pub fn with_connection(mut self, edge: Direction, connection: MapConnection) -> Self {
        self.connections.insert(edge, connection);
        self
    }

    /// Width in tiles.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns true if the position lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Gets the tile at a position, or None off the grid.
    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[pos.y as usize][pos.x as usize])
    }

    /// Overwrites a tile. Returns false and changes nothing off the grid.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.tiles[pos.y as usize][pos.x as usize] = tile;
        true
    }

    /// Returns true if stepping onto this tile kind can start an encounter.
    pub fn is_encounter_tile(&self, tile: Tile) -> bool {
        self.encounter_tiles.contains(&tile)
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.tiles
    }
}

/// What kind of object an interaction represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Door,
    Sign,
}

impl InteractionKind {
    /// Guesses the kind of an untagged interaction from its text.
    ///
    /// "door" always means a door, "house" means a door unless the text also
    /// mentions a sign. Otherwise "sign", "town" or "route" mean a sign.
    ///
    /// # Examples
    ///
    /// ```
    /// use redemu::InteractionKind;
    ///
    /// assert_eq!(InteractionKind::infer("RIVAL'S HOUSE - Keep out!"), Some(InteractionKind::Door));
    /// assert_eq!(InteractionKind::infer("Route 1 this way"), Some(InteractionKind::Sign));
    /// assert_eq!(InteractionKind::infer("PROF. OAK'S LAB"), None);
    /// ```
    pub fn infer(message: &str) -> Option<Self> {
        let text = message.to_lowercase();
        if text.contains("door") || (text.contains("house") && !text.contains("sign")) {
            Some(InteractionKind::Door)
        } else if text.contains("sign") || text.contains("town") || text.contains("route") {
            Some(InteractionKind::Sign)
        } else {
            None
        }
    }

    /// The tile this interaction is drawn as.
    pub fn tile(self) -> Tile {
        match self {
            InteractionKind::Door => Tile::Door,
            InteractionKind::Sign => Tile::Sign,
        }
    }
}

/// A scripted message attached to one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub message: String,
}

/// Registry key: map id plus tile coordinate.
pub type InteractionKey = (String, Position);

/// All point interactions, in registration order.
#[derive(Debug, Clone, Default)]
pub struct InteractionRegistry {
    entries: Vec<(InteractionKey, Interaction)>,
    index: HashMap<InteractionKey, usize>,
}

impl InteractionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an interaction. A second registration on the same tile replaces the first.
    pub fn register(&mut self, map_id: &str, pos: Position, interaction: Interaction) {
        let key = (map_id.to_string(), pos);
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].1 = interaction;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, interaction));
        }
    }

    /// Registers an untagged message, inferring its kind from the text.
    ///
    /// Returns false, registering nothing, when no kind can be inferred.
    pub fn register_inferred(&mut self, map_id: &str, pos: Position, message: &str) -> bool {
        match InteractionKind::infer(message) {
            Some(kind) => {
                self.register(
                    map_id,
                    pos,
                    Interaction {
                        kind,
                        message: message.to_string(),
                    },
                );
                true
            }
            None => {
                warn!(
                    "Interaction at {}:({}, {}) is neither a door nor a sign: {:?}",
                    map_id, pos.x, pos.y, message
                );
                false
            }
        }
    }

    /// Looks up the interaction on a tile.
    pub fn get(&self, map_id: &str, pos: Position) -> Option<&Interaction> {
        self.index
            .get(&(map_id.to_string(), pos))
            .map(|&slot| &self.entries[slot].1)
    }

    /// Interactions belonging to one map, in registration order.
    pub fn for_map<'a>(
        &'a self,
        map_id: &'a str,
    ) -> impl Iterator<Item = (Position, &'a Interaction)> + 'a {
        self.entries
            .iter()
            .filter(move |((id, _), _)| id == map_id)
            .map(|((_, pos), interaction)| (*pos, interaction))
    }

    /// Number of registered interactions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Map templates plus the interaction registry.
#[derive(Debug, Clone, Default)]
pub struct World {
    templates: HashMap<String, Map>,
    /// Point interactions across all maps
    pub interactions: InteractionRegistry,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a map template, replacing any template with the same id.
    pub fn add_map(&mut self, map: Map) {
        self.templates.insert(map.id.clone(), map);
    }

    /// Returns true if a template with this id exists.
    pub fn has_map(&self, map_id: &str) -> bool {
        self.templates.contains_key(map_id)
    }

    /// Produces a playable copy of a map template.
    ///
    /// Every interaction registered for the map overwrites its tile with the
    /// door or sign tile, in registration order.
    pub fn load(&self, map_id: &str) -> RedEmuResult<Map> {
        let mut map = self
            .templates
            .get(map_id)
            .cloned()
            .ok_or_else(|| RedEmuError::UnknownMap(map_id.to_string()))?;

        for (pos, interaction) in self.interactions.for_map(map_id) {
            let tile = interaction.kind.tile();
            if map.set_tile(pos, tile) {
                debug!("Placed {} at {}:({}, {})", tile.name(), map_id, pos.x, pos.y);
            } else {
                warn!(
                    "Interaction at {}:({}, {}) lies outside the map",
                    map_id, pos.x, pos.y
                );
            }
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> Map {
        Map::new(
            "test",
            vec![
                vec![Tile::Wall, Tile::Wall, Tile::Wall],
                vec![Tile::Wall, Tile::Path, Tile::Grass],
                vec![Tile::Wall, Tile::Water, Tile::TallGrass],
            ],
        )
        .unwrap()
        .with_encounter_tiles([Tile::Grass, Tile::TallGrass])
    }

    fn door(message: &str) -> Interaction {
        Interaction {
            kind: InteractionKind::Door,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_tile_codes_round_trip() {
        for code in 0u8..=12 {
            let tile = Tile::try_from(code).unwrap();
            assert_eq!(u8::from(tile), code);
        }
        assert!(Tile::try_from(13).is_err());
    }

    #[test]
    fn test_impassable_set() {
        let impassable: Vec<Tile> = (0u8..=12)
            .filter_map(|c| Tile::try_from(c).ok())
            .filter(|t| t.is_impassable())
            .collect();
        assert_eq!(
            impassable,
            vec![
                Tile::Wall,
                Tile::Water,
                Tile::Roof,
                Tile::BuildingWall,
                Tile::TreeTrunk,
                Tile::TreeLeaves
            ]
        );
        assert!(!Tile::Door.is_impassable());
        assert!(!Tile::Sign.is_impassable());
    }

    #[test]
    fn test_map_rejects_empty_grid() {
        assert!(matches!(
            Map::new("empty", vec![]),
            Err(RedEmuError::InvalidMap(_))
        ));
        assert!(Map::new("empty_row", vec![vec![]]).is_err());
    }

    #[test]
    fn test_tile_at_bounds() {
        let map = sample_map();
        assert_eq!(map.tile_at(Position::new(1, 1)), Some(Tile::Path));
        assert_eq!(map.tile_at(Position::new(2, 2)), Some(Tile::TallGrass));
        assert_eq!(map.tile_at(Position::new(-1, 0)), None);
        assert_eq!(map.tile_at(Position::new(3, 0)), None);
        assert_eq!(map.tile_at(Position::new(0, 3)), None);
    }

    #[test]
    fn test_set_tile_out_of_bounds_is_noop() {
        let mut map = sample_map();
        let before = map.clone();
        assert!(!map.set_tile(Position::new(5, 5), Tile::Door));
        assert_eq!(map, before);
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(
            InteractionKind::infer("This is your house! Get in there!"),
            Some(InteractionKind::Door)
        );
        assert_eq!(
            InteractionKind::infer("The door is locked."),
            Some(InteractionKind::Door)
        );
        assert_eq!(
            InteractionKind::infer("House sign: welcome"),
            Some(InteractionKind::Sign)
        );
        assert_eq!(
            InteractionKind::infer("PALLET TOWN - A sleepy little town."),
            Some(InteractionKind::Sign)
        );
        assert_eq!(InteractionKind::infer("SCIENCE!"), None);
    }

    #[test]
    fn test_registry_last_write_wins() {
        let mut registry = InteractionRegistry::new();
        registry.register("a", Position::new(1, 1), door("first"));
        registry.register("a", Position::new(2, 1), door("second"));
        registry.register("a", Position::new(1, 1), door("replaced"));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("a", Position::new(1, 1)).unwrap().message,
            "replaced"
        );
        let order: Vec<Position> = registry.for_map("a").map(|(p, _)| p).collect();
        assert_eq!(order, vec![Position::new(1, 1), Position::new(2, 1)]);
    }

    #[test]
    fn test_register_inferred_skips_unknown_text() {
        let mut registry = InteractionRegistry::new();
        assert!(!registry.register_inferred("a", Position::new(0, 0), "SCIENCE!"));
        assert!(registry.is_empty());
        assert!(registry.register_inferred("a", Position::new(0, 0), "Route 1"));
        assert_eq!(
            registry.get("a", Position::new(0, 0)).unwrap().kind,
            InteractionKind::Sign
        );
    }

    #[test]
    fn test_load_stamps_interactions_without_touching_template() {
        let mut world = World::new();
        world.add_map(sample_map());
        world
            .interactions
            .register("test", Position::new(1, 1), door("Knock knock"));
        world
            .interactions
            .register("other", Position::new(2, 1), door("Not here"));

        let mut loaded = world.load("test").unwrap();
        assert_eq!(loaded.tile_at(Position::new(1, 1)), Some(Tile::Door));
        assert_eq!(loaded.tile_at(Position::new(2, 1)), Some(Tile::Grass));

        loaded.set_tile(Position::new(2, 2), Tile::Wall);
        let fresh = world.load("test").unwrap();
        assert_eq!(fresh.tile_at(Position::new(2, 2)), Some(Tile::TallGrass));
    }

    #[test]
    fn test_load_unknown_map() {
        let world = World::new();
        assert!(matches!(
            world.load("nowhere"),
            Err(RedEmuError::UnknownMap(_))
        ));
    }
}
