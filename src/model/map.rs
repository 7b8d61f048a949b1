/// The map grid, its tiles, and the view wrapper around it

use super::fixtures::{Fixture, FixtureKind};
use super::player::PlayerCollection;
use super::terrain::{Forest, Ground, River, TileType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub row: i32,
    pub column: i32,
}

impl Point {
    pub const INVALID: Point = Point { row: -1, column: -1 };

    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn is_valid(&self) -> bool {
        self.row >= 0 && self.column >= 0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Size and format version of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDimensions {
    pub rows: i32,
    pub columns: i32,
    pub version: u32,
}

impl MapDimensions {
    pub fn new(rows: i32, columns: i32, version: u32) -> Self {
        Self { rows, columns, version }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.is_valid() && point.row < self.rows && point.column < self.columns
    }
}

/// Contents of one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub terrain: TileType,
    pub mountainous: bool,
    pub rivers: BTreeSet<River>,
    /// Primary ground cover; secondary ground lives in `fixtures`
    pub ground: Option<Ground>,
    /// Primary forest; secondary forests live in `fixtures`
    pub forest: Option<Forest>,
    pub fixtures: Vec<Fixture>,
}

impl Tile {
    pub fn new(terrain: TileType) -> Self {
        Self {
            terrain,
            mountainous: false,
            rivers: BTreeSet::new(),
            ground: None,
            forest: None,
            fixtures: Vec::new(),
        }
    }

    pub fn fixtures_of(&self, kind: FixtureKind) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter().filter(move |f| f.kind() == kind)
    }
}

/// A grid of tiles plus the player roster
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMap {
    pub dimensions: MapDimensions,
    pub players: PlayerCollection,
    tiles: BTreeMap<Point, Tile>,
}

impl WorldMap {
    pub fn new(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            players: PlayerCollection::new(),
            tiles: BTreeMap::new(),
        }
    }

    pub fn tile(&self, point: Point) -> Option<&Tile> {
        self.tiles.get(&point)
    }

    pub fn tile_mut(&mut self, point: Point) -> Option<&mut Tile> {
        self.tiles.get_mut(&point)
    }

    /// Set a tile's terrain, creating the tile if needed
    pub fn set_terrain(&mut self, point: Point, terrain: TileType) -> &mut Tile {
        let tile = self.tiles.entry(point).or_insert_with(|| Tile::new(terrain));
        tile.terrain = terrain;
        tile
    }

    /// Tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (Point, &Tile)> {
        self.tiles.iter().map(|(p, t)| (*p, t))
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Every fixture on the map, with the primary ground and forest of
    /// each tile counted as fixtures too
    pub fn all_fixtures(&self) -> impl Iterator<Item = Fixture> + '_ {
        self.tiles.values().flat_map(|tile| {
            let ground = tile.ground.clone().map(Fixture::Ground);
            let forest = tile.forest.clone().map(Fixture::Forest);
            ground.into_iter().chain(forest).chain(tile.fixtures.iter().cloned())
        })
    }
}

/// A map as seen by one player on one turn, with optional sub-maps
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub map: WorldMap,
    pub current_turn: i32,
    pub submaps: BTreeMap<Point, WorldMap>,
}

impl MapView {
    pub fn new(map: WorldMap, current_turn: i32) -> Self {
        Self {
            map,
            current_turn,
            submaps: BTreeMap::new(),
        }
    }
}
