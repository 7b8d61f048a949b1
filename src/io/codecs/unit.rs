/// Units (with their workers and orders) and fortresses
///
/// These are the only leaf codecs that own children. A unit's text body is
/// its orders; `worker` children are its members. A fortress holds units.
/// Children introduced by later format revisions (`orders`, `results`,
/// `job`, ...) are skipped with a warning rather than rejected.

use crate::error::{MapError, Result};
use crate::io::codec::{mismatch, FixtureDecoder, FixtureEncoder, ReadContext};
use crate::io::helpers::{
    get_attr_with_deprecated, get_attribute_or, get_enum_attribute, get_or_generate_id, get_player_or_independent,
    has_attribute, read_image, require_non_empty, skip_element, write_image, write_image_or_default,
};
use crate::io::node::Node;
use crate::io::token::{StartTag, Token, TokenStream};
use crate::model::{Fixture, FixtureKind, Fortress, TownSize, Unit, Worker};
use tracing::debug;

/// Unit children accepted but not modelled
const TOLERATED_UNIT_CHILDREN: &[&str] = &["orders", "results", "animal"];

const DEFAULT_RACE: &str = "human";

pub struct UnitCodec;

impl UnitCodec {
    pub fn decode_unit(tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Unit> {
        let owner = get_player_or_independent(tag, ctx)?;
        let kind = get_attr_with_deprecated(tag, "kind", "type", ctx.warner)?;
        require_non_empty(tag, "name", false, ctx.warner)?;
        let name = get_attribute_or(tag, "name", "");
        let mut unit = Unit::new(get_or_generate_id(tag, ctx)?, owner, kind, name);
        unit.image = read_image(tag, FixtureKind::Unit.default_image());

        let mut orders = String::new();
        loop {
            match stream.next_token()? {
                Some(Token::Start(child)) if child.is("worker") => {
                    unit.members.push(decode_worker(&child, stream, ctx)?);
                }
                Some(Token::Start(child)) if TOLERATED_UNIT_CHILDREN.contains(&child.lower_name().as_str()) => {
                    ctx.warn(MapError::unsupported_tag(&child.name, child.line))?;
                    skip_element(&child, stream)?;
                }
                Some(Token::Start(child)) => {
                    return Err(MapError::unwanted_child(&tag.name, &child.name, child.line));
                }
                Some(Token::Text(text)) => orders.push_str(&text.content),
                Some(Token::End(end)) if end.is(&tag.name) => break,
                Some(Token::End(_)) => {}
                None => {
                    return Err(MapError::UnexpectedEof {
                        tag: tag.name.clone(),
                        line: tag.line,
                    })
                }
            }
        }
        unit.orders = orders.trim().to_string();
        debug!("Unit {} has {} members", unit.id, unit.members.len());
        Ok(unit)
    }

    pub fn encode_unit(unit: &Unit) -> Node {
        let mut node = Node::new("unit")
            .attribute("owner", unit.owner.number)
            .attribute("kind", &unit.kind)
            .attribute_if(!unit.name.is_empty(), "name", &unit.name)
            .attribute("id", unit.id);
        node = write_image_or_default(node, &unit.image, FixtureKind::Unit.default_image());
        if !unit.orders.is_empty() {
            node = node.text(&unit.orders);
        }
        node.extend_children(unit.members.iter().map(encode_worker));
        node
    }
}

fn decode_worker(tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Worker> {
    require_non_empty(tag, "name", false, ctx.warner)?;
    let worker = Worker {
        name: get_attribute_or(tag, "name", ""),
        race: get_attribute_or(tag, "race", DEFAULT_RACE),
        id: get_or_generate_id(tag, ctx)?,
        image: read_image(tag, Worker::DEFAULT_IMAGE),
    };
    loop {
        match stream.next_token()? {
            Some(Token::Start(child)) => {
                ctx.warn(MapError::unsupported_tag(&child.name, child.line))?;
                skip_element(&child, stream)?;
            }
            Some(Token::End(end)) if end.is(&tag.name) => return Ok(worker),
            Some(_) => {}
            None => {
                return Err(MapError::UnexpectedEof {
                    tag: tag.name.clone(),
                    line: tag.line,
                })
            }
        }
    }
}

fn encode_worker(worker: &Worker) -> Node {
    let node = Node::new("worker")
        .attribute("name", &worker.name)
        .attribute_if(worker.race != DEFAULT_RACE, "race", &worker.race)
        .attribute("id", worker.id);
    write_image_or_default(node, &worker.image, Worker::DEFAULT_IMAGE)
}

impl FixtureDecoder for UnitCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["unit"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        Ok(Fixture::Unit(Self::decode_unit(tag, stream, ctx)?))
    }
}

impl FixtureEncoder for UnitCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Unit]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        match fixture {
            Fixture::Unit(unit) => Ok(Self::encode_unit(unit)),
            other => Err(mismatch("unit", other)),
        }
    }
}

pub struct FortressCodec;

impl FixtureDecoder for FortressCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["fortress"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let owner = get_player_or_independent(tag, ctx)?;
        require_non_empty(tag, "name", false, ctx.warner)?;
        let size = if has_attribute(tag, "size") {
            get_enum_attribute(tag, "size", TownSize::parse)?
        } else {
            TownSize::Small
        };
        let mut fortress = Fortress {
            id: get_or_generate_id(tag, ctx)?,
            owner,
            name: get_attribute_or(tag, "name", ""),
            size,
            units: Vec::new(),
            image: read_image(tag, FixtureKind::Fortress.default_image()),
        };

        loop {
            match stream.next_token()? {
                Some(Token::Start(child)) if child.is("unit") => {
                    fortress.units.push(UnitCodec::decode_unit(&child, stream, ctx)?);
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
        Ok(Fixture::Fortress(fortress))
    }
}

impl FixtureEncoder for FortressCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Fortress]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Fortress(fortress) = fixture else {
            return Err(mismatch("fortress", fixture));
        };
        let mut node = Node::new("fortress")
            .attribute("owner", fortress.owner.number)
            .attribute_if(!fortress.name.is_empty(), "name", &fortress.name)
            .attribute("size", fortress.size.as_str())
            .attribute("id", fortress.id);
        node = write_image(node, fixture);
        node.extend_children(fortress.units.iter().map(UnitCodec::encode_unit));
        Ok(node)
    }
}
