/// Grid, view and submap readers
///
/// `MapReader` pulls tokens and keeps a cursor on the tile currently open.
/// Structural tags (`view`, `submap`, `map`, `row`, `tile`, `player`) are
/// handled here; everything inside a tile goes through the dispatch table
/// and is then placed on the tile.

use super::codec::ReadContext;
use super::codecs::read_player;
use super::dispatch::Dispatch;
use super::helpers::{get_attr_with_deprecated, get_int_attribute, get_int_attribute_or, parse_int};
use super::ids::IdFactory;
use super::token::{StartTag, Token, TokenStream};
use crate::error::{MapError, Result};
use crate::model::{Fixture, MapDimensions, MapView, Point, TextFixture, Tile, TileType, WorldMap};
use crate::warning::Warning;
use tracing::{debug, info};

/// Format version assumed when a map does not declare one
pub const DEFAULT_VERSION: u32 = 1;

pub struct MapReader<'a> {
    dispatch: &'a Dispatch,
    warner: &'a dyn Warning,
}

impl<'a> MapReader<'a> {
    pub fn new(dispatch: &'a Dispatch, warner: &'a dyn Warning) -> Self {
        Self { dispatch, warner }
    }

    /// Read a whole document whose root is `view` or `map`
    pub fn read_view(&self, stream: &mut dyn TokenStream) -> Result<MapView> {
        let root = first_element(stream)?;
        let mut ids = IdFactory::new();
        let view = match root.lower_name().as_str() {
            "view" => self.read_view_element(&root, stream, &mut ids)?,
            "map" => MapView::new(self.read_map_element(&root, stream, &mut ids)?, 0),
            _ => return Err(MapError::unsupported_tag(&root.name, root.line)),
        };
        info!(
            "Read {} from '{}': {} tiles, {} submaps",
            root.name,
            stream.current_file(),
            view.map.tile_count(),
            view.submaps.len()
        );
        Ok(view)
    }

    /// Read a document whose root must be `map`
    pub fn read_map(&self, stream: &mut dyn TokenStream) -> Result<WorldMap> {
        let root = first_element(stream)?;
        if !root.is("map") {
            return Err(MapError::unsupported_tag(&root.name, root.line));
        }
        let mut ids = IdFactory::new();
        self.read_map_element(&root, stream, &mut ids)
    }

    fn read_view_element(&self, tag: &StartTag, stream: &mut dyn TokenStream, ids: &mut IdFactory) -> Result<MapView> {
        let current_turn: i32 = get_int_attribute(tag, "current_turn")?;
        let current_player: Option<i32> = match tag.attr("current_player") {
            Some(value) => Some(parse_int(tag, "current_player", value)?),
            None => None,
        };

        let mut main: Option<WorldMap> = None;
        let mut submaps = Vec::new();
        loop {
            match stream.next_token()? {
                Some(Token::Start(child)) if child.is("map") => {
                    if main.is_some() {
                        return Err(MapError::unwanted_child(&tag.name, &child.name, child.line));
                    }
                    main = Some(self.read_map_element(&child, stream, ids)?);
                }
                Some(Token::Start(child)) if child.is("submap") => {
                    submaps.push(self.read_submap(&child, stream, ids)?);
                }
                Some(Token::Start(child)) => {
                    return Err(MapError::unwanted_child(&tag.name, &child.name, child.line));
                }
                Some(Token::Text(text)) if !text.is_blank() => {
                    return Err(MapError::unwanted_child(&tag.name, "text", text.line));
                }
                Some(Token::End(end)) if end.is(&tag.name) => break,
                Some(_) => {}
                None => {
                    return Err(MapError::UnexpectedEof {
                        tag: tag.name.clone(),
                        line: tag.line,
                    })
                }
            }
        }

        let mut map = main.ok_or_else(|| MapError::MissingChild {
            tag: tag.name.clone(),
            line: tag.line,
        })?;
        if let Some(number) = current_player {
            map.players.set_current(number);
        }
        let mut view = MapView::new(map, current_turn);
        view.submaps.extend(submaps);
        Ok(view)
    }

    fn read_submap(
        &self,
        tag: &StartTag,
        stream: &mut dyn TokenStream,
        ids: &mut IdFactory,
    ) -> Result<(Point, WorldMap)> {
        let point = Point::new(get_int_attribute(tag, "row")?, get_int_attribute(tag, "column")?);
        let mut map = None;
        loop {
            match stream.next_token()? {
                Some(Token::Start(child)) if child.is("map") && map.is_none() => {
                    map = Some(self.read_map_element(&child, stream, ids)?);
                }
                Some(Token::Start(child)) => {
                    return Err(MapError::unwanted_child(&tag.name, &child.name, child.line));
                }
                Some(Token::Text(text)) if !text.is_blank() => {
                    return Err(MapError::unwanted_child(&tag.name, "text", text.line));
                }
                Some(Token::End(end)) if end.is(&tag.name) => break,
                Some(_) => {}
                None => {
                    return Err(MapError::UnexpectedEof {
                        tag: tag.name.clone(),
                        line: tag.line,
                    })
                }
            }
        }
        let map = map.ok_or_else(|| MapError::MissingChild {
            tag: tag.name.clone(),
            line: tag.line,
        })?;
        debug!("Read submap at {}", point);
        Ok((point, map))
    }

    /// Read a `map` element whose start tag has already been consumed
    pub fn read_map_element(&self, tag: &StartTag, stream: &mut dyn TokenStream, ids: &mut IdFactory) -> Result<WorldMap> {
        let version: u32 = get_int_attribute_or(tag, "version", DEFAULT_VERSION)?;
        let rows = get_int_attribute(tag, "rows")?;
        let columns = get_int_attribute(tag, "columns")?;
        let mut map = WorldMap::new(MapDimensions::new(rows, columns, version));
        if let Some(value) = tag.attr("current_player") {
            map.players.set_current(parse_int(tag, "current_player", value)?);
        }
        debug!("Reading map {}x{} (version {})", rows, columns, version);

        // Position and tag name of the tile currently open
        let mut cursor: Option<(Point, String)> = None;
        loop {
            let token = match stream.next_token()? {
                Some(token) => token,
                None => {
                    return Err(MapError::UnexpectedEof {
                        tag: tag.name.clone(),
                        line: tag.line,
                    })
                }
            };
            match token {
                Token::End(end) => {
                    if cursor.is_some() && end.is("tile") {
                        cursor = None;
                    } else if cursor.is_none() && end.is(&tag.name) {
                        break;
                    }
                }
                Token::Text(text) => {
                    if text.is_blank() {
                        continue;
                    }
                    match &cursor {
                        Some((point, _)) => {
                            let note = Fixture::Text(TextFixture::new(text.content.trim(), -1));
                            place_on(&mut map, *point, note);
                        }
                        None => return Err(MapError::unwanted_child(&tag.name, "text", text.line)),
                    }
                }
                Token::Start(child) => {
                    let name = child.lower_name();
                    match (name.as_str(), cursor.clone()) {
                        ("row", _) => {}
                        ("player", Some((_, tile))) | ("tile", Some((_, tile))) => {
                            return Err(MapError::unwanted_child(tile, &child.name, child.line));
                        }
                        ("player", None) => {
                            let player = read_player(&child, stream, self.warner)?;
                            map.players.add(player);
                        }
                        ("tile", None) => {
                            let point = self.open_tile(&child, &mut map)?;
                            cursor = Some((point, child.name));
                        }
                        (_, None) => {
                            return Err(if self.dispatch.readers.has(&name) {
                                MapError::unwanted_child(&tag.name, &child.name, child.line)
                            } else {
                                MapError::unsupported_tag(&child.name, child.line)
                            });
                        }
                        (_, Some((point, _))) => {
                            let fixture = {
                                let mut ctx = ReadContext::new(ids, &map.players, self.warner, version);
                                self.dispatch.decode(&child, stream, &mut ctx)?
                            };
                            place_on(&mut map, point, fixture);
                        }
                    }
                }
            }
        }
        Ok(map)
    }

    /// Create the tile a `tile` start tag describes and return its position
    fn open_tile(&self, tag: &StartTag, map: &mut WorldMap) -> Result<Point> {
        let point = Point::new(get_int_attribute(tag, "row")?, get_int_attribute(tag, "column")?);
        let dimensions = map.dimensions;
        if !dimensions.contains(point) {
            let (param, value) = if point.row < 0 || point.row >= dimensions.rows {
                ("row", point.row)
            } else {
                ("column", point.column)
            };
            return Err(MapError::InvalidValue {
                tag: tag.name.clone(),
                param: param.to_string(),
                value: value.to_string(),
                line: tag.line,
            });
        }
        let kind = get_attr_with_deprecated(tag, "kind", "type", self.warner)?;
        let terrain = TileType::parse(&kind).ok_or_else(|| MapError::InvalidValue {
            tag: tag.name.clone(),
            param: "kind".to_string(),
            value: kind.clone(),
            line: tag.line,
        })?;

        if terrain == TileType::Mountain && dimensions.version >= 2 {
            self.warner.warn(MapError::DeprecatedProperty {
                tag: tag.name.clone(),
                old: "kind=\"mountain\"".to_string(),
                preferred: "<mountain/>".to_string(),
                line: tag.line,
            })?;
            map.set_terrain(point, TileType::Plains).mountainous = true;
        } else {
            map.set_terrain(point, terrain);
        }
        Ok(point)
    }
}

/// Put a decoded fixture on `tile`
///
/// Mountains set the flag and rivers join the river set. A ground or
/// forest becomes the primary cover when there is none. An identical
/// repeat is dropped. An exposed ground displaces a hidden primary, which
/// moves into the fixture list. Anything else is appended.
pub fn place_fixture(tile: &mut Tile, fixture: Fixture) {
    match fixture {
        Fixture::Mountain => tile.mountainous = true,
        Fixture::River(river) => {
            tile.rivers.insert(river);
        }
        Fixture::Ground(ground) => match tile.ground.take() {
            None => tile.ground = Some(ground),
            Some(old) if old == ground => tile.ground = Some(old),
            Some(old) if !old.exposed && ground.exposed => {
                tile.fixtures.push(Fixture::Ground(old));
                tile.ground = Some(ground);
            }
            Some(old) => {
                tile.ground = Some(old);
                tile.fixtures.push(Fixture::Ground(ground));
            }
        },
        Fixture::Forest(forest) => match &tile.forest {
            None => tile.forest = Some(forest),
            Some(old) if *old == forest => {}
            Some(_) => tile.fixtures.push(Fixture::Forest(forest)),
        },
        other => tile.fixtures.push(other),
    }
}

fn place_on(map: &mut WorldMap, point: Point, fixture: Fixture) {
    if let Some(tile) = map.tile_mut(point) {
        place_fixture(tile, fixture);
    }
}

/// Skip to the root element, ignoring leading whitespace
fn first_element(stream: &mut dyn TokenStream) -> Result<StartTag> {
    loop {
        match stream.next_token()? {
            Some(Token::Start(tag)) => return Ok(tag),
            Some(Token::Text(text)) if text.is_blank() => {}
            Some(Token::Text(text)) => return Err(MapError::unwanted_child("document", "text", text.line)),
            Some(Token::End(end)) => return Err(MapError::unsupported_tag(&end.name, end.line)),
            None => return Err(MapError::EmptyDocument),
        }
    }
}
