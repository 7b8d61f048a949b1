/// Free-text notes

use crate::error::Result;
use crate::io::codec::{mismatch, FixtureDecoder, FixtureEncoder, ReadContext};
use crate::io::helpers::{get_int_attribute_or, read_image, read_text_content, write_image};
use crate::io::node::Node;
use crate::io::token::{StartTag, TokenStream};
use crate::model::{Fixture, FixtureKind, TextFixture};

pub struct TextCodec;

impl FixtureDecoder for TextCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["text"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, _ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let turn = get_int_attribute_or(tag, "turn", -1)?;
        let image = read_image(tag, FixtureKind::Text.default_image());
        let mut text = TextFixture::new(read_text_content(tag, stream)?, turn);
        text.image = image;
        Ok(Fixture::Text(text))
    }
}

impl FixtureEncoder for TextCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Text]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Text(text) = fixture else {
            return Err(mismatch("text", fixture));
        };
        let node = Node::new("text").attribute_if(text.turn >= 0, "turn", text.turn);
        Ok(write_image(node, fixture).text(&text.text))
    }
}
