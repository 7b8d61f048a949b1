/// In-memory map model
///
/// The object graph the readers build and the writers walk: a grid of
/// tiles, the player roster, and every kind of fixture a tile can hold.

pub mod fixtures;
pub mod map;
pub mod player;
pub mod terrain;

// Re-export commonly used types
pub use fixtures::*;
pub use map::{MapDimensions, MapView, Point, Tile, WorldMap};
pub use player::{Player, PlayerCollection};
pub use terrain::{Forest, Ground, River, TileType};
