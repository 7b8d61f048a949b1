/// Model → node tree
///
/// The writer only decides the document's shape. Layout belongs to
/// `NodeSerializer`.

use super::codecs::write_player;
use super::dispatch::Dispatch;
use super::node::Node;
use crate::error::Result;
use crate::model::{Fixture, MapView, Point, Tile, WorldMap};
use tracing::debug;

pub struct MapWriter<'a> {
    dispatch: &'a Dispatch,
}

impl<'a> MapWriter<'a> {
    pub fn new(dispatch: &'a Dispatch) -> Self {
        Self { dispatch }
    }

    /// `view` root holding the main map and any submaps
    pub fn view_node(&self, view: &MapView) -> Result<Node> {
        let mut root = Node::new("view")
            .attribute_if(
                view.map.players.current_number().is_some(),
                "current_player",
                view.map.players.current_number().unwrap_or_default(),
            )
            .attribute("current_turn", view.current_turn);
        root.push_child(self.map_node(&view.map)?);
        for (point, submap) in &view.submaps {
            root.push_child(
                Node::new("submap")
                    .attribute("row", point.row)
                    .attribute("column", point.column)
                    .child(self.map_node(submap)?),
            );
        }
        Ok(root)
    }

    /// `map` element: roster, then tiles grouped into rows
    pub fn map_node(&self, map: &WorldMap) -> Result<Node> {
        let dims = map.dimensions;
        let mut node = Node::new("map")
            .attribute("version", dims.version)
            .attribute("rows", dims.rows)
            .attribute("columns", dims.columns);
        node.extend_children(map.players.iter().map(write_player));

        let mut row: Option<(i32, Node)> = None;
        for (point, tile) in map.tiles() {
            let tile_node = self.tile_node(point, tile)?;
            match &mut row {
                Some((index, current)) if *index == point.row => current.push_child(tile_node),
                _ => {
                    if let Some((_, finished)) = row.take() {
                        node.push_child(finished);
                    }
                    row = Some((point.row, Node::new("row").attribute("index", point.row).child(tile_node)));
                }
            }
        }
        if let Some((_, finished)) = row {
            node.push_child(finished);
        }
        debug!("Built node tree for {} tiles", map.tile_count());
        Ok(node)
    }

    /// A standalone `map` document, carrying the current player itself
    pub fn bare_map_node(&self, map: &WorldMap) -> Result<Node> {
        let node = self.map_node(map)?;
        Ok(match map.players.current_number() {
            Some(number) => node.attribute("current_player", number),
            None => node,
        })
    }

    fn tile_node(&self, point: Point, tile: &Tile) -> Result<Node> {
        let mut node = Node::new("tile")
            .attribute("row", point.row)
            .attribute("column", point.column)
            .attribute("kind", tile.terrain.as_str());
        if tile.mountainous {
            node.push_child(self.dispatch.encode(&Fixture::Mountain)?);
        }
        for river in &tile.rivers {
            node.push_child(self.dispatch.encode(&Fixture::River(*river))?);
        }
        if let Some(ground) = &tile.ground {
            node.push_child(self.dispatch.encode(&Fixture::Ground(ground.clone()))?);
        }
        if let Some(forest) = &tile.forest {
            node.push_child(self.dispatch.encode(&Fixture::Forest(forest.clone()))?);
        }
        for fixture in &tile.fixtures {
            node.push_child(self.dispatch.encode(fixture)?);
        }
        Ok(node)
    }
}
