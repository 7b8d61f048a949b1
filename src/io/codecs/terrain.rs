/// Terrain features: mountains, rivers, ground, forests and the id-only
/// hill/oasis/sandbar family

use crate::error::{MapError, Result};
use crate::io::codec::{mismatch, FixtureDecoder, FixtureEncoder, ReadContext};
use crate::io::helpers::{
    get_attr_with_deprecated, get_attribute, get_bool_attribute, get_bool_attribute_or, get_or_generate_id,
    read_image, spin_until_end, write_image,
};
use crate::io::node::Node;
use crate::io::token::{StartTag, TokenStream};
use crate::model::{Fixture, FixtureKind, Forest, Ground, River, SimpleTerrain};

/// `<mountain/>`: only meaningful as a tile flag
pub struct MountainCodec;

impl FixtureDecoder for MountainCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["mountain"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, _ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        spin_until_end(tag, stream)?;
        Ok(Fixture::Mountain)
    }

    /// Version 1 maps had mountain as a terrain type instead
    fn supports_version(&self, _tag: &str, version: u32) -> bool {
        version >= 2
    }
}

impl FixtureEncoder for MountainCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Mountain]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        match fixture {
            Fixture::Mountain => Ok(Node::new("mountain")),
            other => Err(mismatch("mountain", other)),
        }
    }
}

pub struct RiverCodec;

impl FixtureDecoder for RiverCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["river", "lake"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, _ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let river = if tag.is("lake") {
            River::Lake
        } else {
            let direction = get_attribute(tag, "direction")?;
            River::from_direction(direction).ok_or_else(|| MapError::InvalidValue {
                tag: tag.name.clone(),
                param: "direction".to_string(),
                value: direction.to_string(),
                line: tag.line,
            })?
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::River(river))
    }
}

impl FixtureEncoder for RiverCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::River]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        match fixture {
            Fixture::River(River::Lake) => Ok(Node::new("lake")),
            Fixture::River(river) => Ok(Node::new("river").attribute("direction", river.direction())),
            other => Err(mismatch("river", other)),
        }
    }
}

pub struct GroundCodec;

impl FixtureDecoder for GroundCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["ground"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let kind = get_attr_with_deprecated(tag, "kind", "ground", ctx.warner)?;
        let exposed = get_bool_attribute(tag, "exposed")?;
        let mut ground = Ground::new(get_or_generate_id(tag, ctx)?, kind, exposed);
        ground.image = read_image(tag, FixtureKind::Ground.default_image());
        spin_until_end(tag, stream)?;
        Ok(Fixture::Ground(ground))
    }
}

impl FixtureEncoder for GroundCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Ground]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Ground(ground) = fixture else {
            return Err(mismatch("ground", fixture));
        };
        let node = Node::new("ground")
            .attribute("kind", &ground.kind)
            .attribute("exposed", ground.exposed)
            .attribute("id", ground.id);
        Ok(write_image(node, fixture))
    }
}

pub struct ForestCodec;

impl FixtureDecoder for ForestCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["forest"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let kind = get_attribute(tag, "kind")?.to_string();
        let rows = get_bool_attribute_or(tag, "rows", false)?;
        let mut forest = Forest::new(get_or_generate_id(tag, ctx)?, kind, rows);
        forest.image = read_image(tag, FixtureKind::Forest.default_image());
        spin_until_end(tag, stream)?;
        Ok(Fixture::Forest(forest))
    }
}

impl FixtureEncoder for ForestCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Forest]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Forest(forest) = fixture else {
            return Err(mismatch("forest", fixture));
        };
        let node = Node::new("forest")
            .attribute("kind", &forest.kind)
            .attribute_if(forest.rows, "rows", true)
            .attribute("id", forest.id);
        Ok(write_image(node, fixture))
    }
}

/// Hills, oases and sandbars
pub struct SimpleTerrainCodec;

impl FixtureDecoder for SimpleTerrainCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["hill", "oasis", "sandbar"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let kind = match tag.lower_name().as_str() {
            "hill" => FixtureKind::Hill,
            "oasis" => FixtureKind::Oasis,
            _ => FixtureKind::Sandbar,
        };
        let mut terrain = SimpleTerrain::new(get_or_generate_id(tag, ctx)?);
        terrain.image = read_image(tag, kind.default_image());
        spin_until_end(tag, stream)?;
        Ok(match kind {
            FixtureKind::Hill => Fixture::Hill(terrain),
            FixtureKind::Oasis => Fixture::Oasis(terrain),
            _ => Fixture::Sandbar(terrain),
        })
    }
}

impl FixtureEncoder for SimpleTerrainCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Hill, FixtureKind::Oasis, FixtureKind::Sandbar]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let (name, terrain) = match fixture {
            Fixture::Hill(t) => ("hill", t),
            Fixture::Oasis(t) => ("oasis", t),
            Fixture::Sandbar(t) => ("sandbar", t),
            other => return Err(mismatch("hill, oasis or sandbar", other)),
        };
        Ok(write_image(Node::new(name).attribute("id", terrain.id), fixture))
    }
}
