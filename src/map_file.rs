/// Map file import/export
///
/// File-level entry points around the reader and writer: open a document
/// from disk (following includes), or from a string, and write a view back
/// out. `MapSummary` is a small serde view of a map used by the CLI.

use crate::config::MapIoConfig;
use crate::error::{MapError, Result};
use crate::io::{Dispatch, FileOpener, IncludingStream, MapReader, MapWriter, NodeSerializer, XmlTokenSource};
use crate::model::MapView;
use crate::warning::Warning;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Read a map or view document from disk
pub fn read_map_file(
    path: impl AsRef<Path>,
    dispatch: &Dispatch,
    config: &MapIoConfig,
    warner: &dyn Warning,
) -> Result<MapView> {
    let file = path.as_ref().to_string_lossy().into_owned();
    let opener = FileOpener;
    let mut stream = IncludingStream::open(&file, &opener)?.with_max_depth(config.max_include_depth);
    MapReader::new(dispatch, warner).read_view(&mut stream)
}

/// Read a document held in memory
///
/// `name` stands in for the file name: includes are resolved on disk
/// relative to its directory.
pub fn read_map_str(
    source: &str,
    name: &str,
    dispatch: &Dispatch,
    config: &MapIoConfig,
    warner: &dyn Warning,
) -> Result<MapView> {
    let opener = FileOpener;
    let root = Box::new(XmlTokenSource::from_text(source, name));
    let mut stream = IncludingStream::new(root, &opener).with_max_depth(config.max_include_depth);
    MapReader::new(dispatch, warner).read_view(&mut stream)
}

/// Serialize a view to a complete document
pub fn write_map_string(view: &MapView, dispatch: &Dispatch, config: &MapIoConfig) -> Result<String> {
    let node = MapWriter::new(dispatch).view_node(view)?;
    NodeSerializer::from_config(config).to_string(&node)
}

pub fn write_map_file(
    path: impl AsRef<Path>,
    view: &MapView,
    dispatch: &Dispatch,
    config: &MapIoConfig,
) -> Result<()> {
    let path = path.as_ref();
    let xml = write_map_string(view, dispatch, config)?;
    std::fs::write(path, &xml)?;
    info!("Wrote {} bytes to {}", xml.len(), path.display());
    Ok(())
}

/// Headline numbers for a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "summary")]
pub struct MapSummary {
    pub rows: i32,
    pub columns: i32,
    pub version: u32,
    pub current_turn: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_player: Option<i32>,

    pub players: usize,
    pub tiles: usize,
    pub submaps: usize,

    /// Fixture count per kind, primary ground and forest included
    #[serde(default)]
    pub fixtures: BTreeMap<String, usize>,
}

impl MapSummary {
    pub fn from_view(view: &MapView) -> Self {
        let map = &view.map;
        let mut fixtures = BTreeMap::new();
        for fixture in map.all_fixtures() {
            *fixtures.entry(fixture.kind().to_string()).or_insert(0) += 1;
        }
        Self {
            rows: map.dimensions.rows,
            columns: map.dimensions.columns,
            version: map.dimensions.version,
            current_turn: view.current_turn,
            current_player: map.players.current_number(),
            players: map.players.len(),
            tiles: map.tile_count(),
            submaps: view.submaps.len(),
            fixtures,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_xml(&self) -> Result<String> {
        quick_xml::se::to_string(self).map_err(|e| MapError::XmlError(e.to_string()))
    }
}
