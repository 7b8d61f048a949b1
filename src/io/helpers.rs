/// Attribute access and stream-draining helpers shared by every codec
///
/// All lookups are case-insensitive. Every failure names the tag, the
/// attribute and the line, so a bad map can be fixed by hand.

use super::codec::ReadContext;
use super::node::Node;
use super::token::{StartTag, Token, TokenStream};
use crate::error::{MapError, Result};
use crate::model::{Fixture, Player};
use crate::warning::Warning;
use std::str::FromStr;
use tracing::debug;

/// Required attribute; missing is a format error
pub fn get_attribute<'t>(tag: &'t StartTag, name: &str) -> Result<&'t str> {
    tag.attr(name)
        .ok_or_else(|| MapError::missing_parameter(&tag.name, name, tag.line))
}

pub fn get_attribute_or(tag: &StartTag, name: &str, default: &str) -> String {
    tag.attr(name).unwrap_or(default).to_string()
}

pub fn has_attribute(tag: &StartTag, name: &str) -> bool {
    tag.attr(name).is_some()
}

/// Attribute that used to be spelled differently
///
/// The preferred name wins when both are present. Only the deprecated
/// spelling present yields its value and one warning. Neither present is
/// a missing-parameter error naming the preferred spelling.
pub fn get_attr_with_deprecated(
    tag: &StartTag,
    preferred: &str,
    deprecated: &str,
    warner: &dyn Warning,
) -> Result<String> {
    if let Some(value) = tag.attr(preferred) {
        return Ok(value.to_string());
    }
    match tag.attr(deprecated) {
        Some(value) => {
            warner.warn(MapError::DeprecatedProperty {
                tag: tag.name.clone(),
                old: deprecated.to_string(),
                preferred: preferred.to_string(),
                line: tag.line,
            })?;
            Ok(value.to_string())
        }
        None => Err(MapError::missing_parameter(&tag.name, preferred, tag.line)),
    }
}

/// Check that an attribute is present and non-empty
///
/// Fatal when `mandatory`, otherwise reported as a warning.
pub fn require_non_empty(tag: &StartTag, name: &str, mandatory: bool, warner: &dyn Warning) -> Result<()> {
    let present = tag.attr(name).map(|v| !v.trim().is_empty()).unwrap_or(false);
    if present {
        return Ok(());
    }
    let problem = MapError::missing_parameter(&tag.name, name, tag.line);
    if mandatory {
        Err(problem)
    } else {
        warner.warn(problem)
    }
}

/// Parse a number that came from `name` on `tag`
pub fn parse_int<T: FromStr>(tag: &StartTag, name: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| MapError::NumberFormat {
        tag: tag.name.clone(),
        param: name.to_string(),
        value: value.to_string(),
        line: tag.line,
    })
}

pub fn get_int_attribute<T: FromStr>(tag: &StartTag, name: &str) -> Result<T> {
    parse_int(tag, name, get_attribute(tag, name)?)
}

pub fn get_int_attribute_or<T: FromStr>(tag: &StartTag, name: &str, default: T) -> Result<T> {
    match tag.attr(name) {
        Some(value) => parse_int(tag, name, value),
        None => Ok(default),
    }
}

fn parse_bool(tag: &StartTag, name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(MapError::InvalidValue {
            tag: tag.name.clone(),
            param: name.to_string(),
            value: value.to_string(),
            line: tag.line,
        }),
    }
}

pub fn get_bool_attribute(tag: &StartTag, name: &str) -> Result<bool> {
    parse_bool(tag, name, get_attribute(tag, name)?)
}

pub fn get_bool_attribute_or(tag: &StartTag, name: &str, default: bool) -> Result<bool> {
    match tag.attr(name) {
        Some(value) => parse_bool(tag, name, value),
        None => Ok(default),
    }
}

/// Value of `name` parsed with `parse`, failing with `InvalidValue`
pub fn get_enum_attribute<T>(tag: &StartTag, name: &str, parse: fn(&str) -> Option<T>) -> Result<T> {
    let value = get_attribute(tag, name)?;
    parse(value).ok_or_else(|| MapError::InvalidValue {
        tag: tag.name.clone(),
        param: name.to_string(),
        value: value.to_string(),
        line: tag.line,
    })
}

/// Consume tokens through the end tag matching `tag`
///
/// Text is skipped. Any start tag before the end is an unwanted child.
pub fn spin_until_end(tag: &StartTag, stream: &mut dyn TokenStream) -> Result<()> {
    loop {
        match stream.next_token()? {
            Some(Token::Start(child)) => {
                return Err(MapError::unwanted_child(&tag.name, &child.name, child.line));
            }
            Some(Token::End(end)) if end.is(&tag.name) => return Ok(()),
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

/// Consume `tag` and everything nested inside it
pub fn skip_element(tag: &StartTag, stream: &mut dyn TokenStream) -> Result<()> {
    let mut depth = 0usize;
    loop {
        match stream.next_token()? {
            Some(Token::Start(_)) => depth += 1,
            Some(Token::End(_)) if depth > 0 => depth -= 1,
            Some(Token::End(end)) if end.is(&tag.name) => return Ok(()),
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

/// Collect the text inside `tag` through its end tag, trimmed
///
/// Child elements are not allowed.
pub fn read_text_content(tag: &StartTag, stream: &mut dyn TokenStream) -> Result<String> {
    let mut text = String::new();
    loop {
        match stream.next_token()? {
            Some(Token::Text(t)) => text.push_str(&t.content),
            Some(Token::Start(child)) => {
                return Err(MapError::unwanted_child(&tag.name, &child.name, child.line));
            }
            Some(Token::End(end)) if end.is(&tag.name) => return Ok(text.trim().to_string()),
            Some(Token::End(_)) => {}
            None => {
                return Err(MapError::UnexpectedEof {
                    tag: tag.name.clone(),
                    line: tag.line,
                })
            }
        }
    }
}

/// The `image` attribute; empty when absent or equal to `default`
pub fn read_image(tag: &StartTag, default: &str) -> String {
    match tag.attr("image") {
        Some(image) if image != default => image.to_string(),
        _ => String::new(),
    }
}

/// Add `image` unless it is empty or the kind's default
pub fn write_image(node: Node, fixture: &Fixture) -> Node {
    write_image_or_default(node, fixture.image(), fixture.default_image())
}

/// `write_image` for entities that are not fixtures
pub fn write_image_or_default(node: Node, image: &str, default: &str) -> Node {
    node.attribute_if(!image.is_empty() && image != default, "image", image)
}

/// Entity id: registered if given, generated with a warning otherwise
pub fn get_or_generate_id(tag: &StartTag, ctx: &mut ReadContext<'_>) -> Result<u32> {
    ctx.ids.get_or_generate(tag, ctx.warner)
}

/// Owner from the `owner` attribute, resolved against the roster
///
/// Missing owner is a warning and yields the independent player.
pub fn get_player_or_independent(tag: &StartTag, ctx: &ReadContext<'_>) -> Result<Player> {
    match tag.attr("owner") {
        Some(value) => {
            let number: i32 = parse_int(tag, "owner", value)?;
            let player = ctx.players.get_player(number);
            debug!("Resolved owner {} of <{}> to '{}'", number, tag.name, player.name);
            Ok(player)
        }
        None => {
            ctx.warner
                .warn(MapError::missing_parameter(&tag.name, "owner", tag.line))?;
            Ok(ctx.players.independent())
        }
    }
}

/// Whether a token is whitespace-only text
pub fn is_blank(token: &Token) -> bool {
    matches!(token, Token::Text(t) if t.is_blank())
}
