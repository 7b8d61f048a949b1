/// Terrain types and the terrain features that live on a tile itself
/// rather than in its fixture list

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base terrain of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Tundra,
    Desert,
    /// Only valid in version 1 maps; later versions use a mountain flag
    Mountain,
    BorealForest,
    TemperateForest,
    Ocean,
    Plains,
    Jungle,
    Steppe,
    Swamp,
}

impl TileType {
    pub const ALL: [TileType; 10] = [
        TileType::Tundra,
        TileType::Desert,
        TileType::Mountain,
        TileType::BorealForest,
        TileType::TemperateForest,
        TileType::Ocean,
        TileType::Plains,
        TileType::Jungle,
        TileType::Steppe,
        TileType::Swamp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TileType::Tundra => "tundra",
            TileType::Desert => "desert",
            TileType::Mountain => "mountain",
            TileType::BorealForest => "boreal_forest",
            TileType::TemperateForest => "temperate_forest",
            TileType::Ocean => "ocean",
            TileType::Plains => "plains",
            TileType::Jungle => "jungle",
            TileType::Steppe => "steppe",
            TileType::Swamp => "swamp",
        }
    }

    /// Parse a terrain name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == lower)
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// River segments and lakes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum River {
    North,
    East,
    South,
    West,
    Lake,
}

impl River {
    /// Direction name as written in `<river direction="...">`
    pub fn direction(self) -> &'static str {
        match self {
            River::North => "north",
            River::East => "east",
            River::South => "south",
            River::West => "west",
            River::Lake => "lake",
        }
    }

    pub fn from_direction(direction: &str) -> Option<Self> {
        match direction.to_lowercase().as_str() {
            "north" => Some(River::North),
            "east" => Some(River::East),
            "south" => Some(River::South),
            "west" => Some(River::West),
            "lake" => Some(River::Lake),
            _ => None,
        }
    }
}

/// Ground cover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ground {
    pub id: u32,
    pub kind: String,
    pub exposed: bool,
    pub image: String,
}

impl Ground {
    pub fn new(id: u32, kind: impl Into<String>, exposed: bool) -> Self {
        Self {
            id,
            kind: kind.into(),
            exposed,
            image: String::new(),
        }
    }

    /// Same ground ignoring id and image
    pub fn same_cover(&self, other: &Ground) -> bool {
        self.kind == other.kind && self.exposed == other.exposed
    }
}

/// Forest cover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forest {
    pub id: u32,
    pub kind: String,
    /// Planted in rows
    pub rows: bool,
    pub image: String,
}

impl Forest {
    pub fn new(id: u32, kind: impl Into<String>, rows: bool) -> Self {
        Self {
            id,
            kind: kind.into(),
            rows,
            image: String::new(),
        }
    }

    /// Same forest ignoring id and image
    pub fn same_cover(&self, other: &Forest) -> bool {
        self.kind == other.kind && self.rows == other.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_type_parse_case_insensitive() {
        assert_eq!(TileType::parse("Boreal_Forest"), Some(TileType::BorealForest));
        assert_eq!(TileType::parse("plains"), Some(TileType::Plains));
        assert_eq!(TileType::parse("lava"), None);
    }

    #[test]
    fn test_tile_type_names_are_unique() {
        for a in TileType::ALL {
            assert_eq!(TileType::parse(a.as_str()), Some(a));
        }
    }

    #[test]
    fn test_river_directions() {
        assert_eq!(River::from_direction("NORTH"), Some(River::North));
        assert_eq!(River::Lake.direction(), "lake");
        assert_eq!(River::from_direction("up"), None);
    }

    #[test]
    fn test_ground_same_cover_ignores_id() {
        let a = Ground::new(1, "rock", true);
        let b = Ground::new(2, "rock", true);
        assert!(a.same_cover(&b));
        assert_ne!(a, b);
    }
}
