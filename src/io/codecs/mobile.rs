/// Animals and immortals

use crate::error::{MapError, Result};
use crate::io::codec::{mismatch, FixtureDecoder, FixtureEncoder, ReadContext};
use crate::io::helpers::{
    get_attribute, get_attribute_or, get_bool_attribute_or, get_int_attribute_or, get_or_generate_id, read_image,
    spin_until_end, write_image,
};
use crate::io::node::Node;
use crate::io::token::{StartTag, TokenStream};
use crate::model::{Animal, Fixture, FixtureKind, Immortal, ImmortalKind};

const DEFAULT_ANIMAL_STATUS: &str = "wild";

pub struct AnimalCodec;

impl FixtureDecoder for AnimalCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["animal"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let kind = get_attribute(tag, "kind")?.to_string();
        let mut animal = Animal::new(0, kind);
        animal.talking = get_bool_attribute_or(tag, "talking", false)?;
        animal.status = get_attribute_or(tag, "status", DEFAULT_ANIMAL_STATUS);
        animal.born = get_int_attribute_or(tag, "born", -1)?;
        animal.id = get_or_generate_id(tag, ctx)?;
        animal.image = read_image(tag, FixtureKind::Animal.default_image());
        spin_until_end(tag, stream)?;
        Ok(Fixture::Animal(animal))
    }
}

impl FixtureEncoder for AnimalCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Animal]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Animal(animal) = fixture else {
            return Err(mismatch("animal", fixture));
        };
        let node = Node::new("animal")
            .attribute("kind", &animal.kind)
            .attribute_if(animal.talking, "talking", true)
            .attribute_if(animal.status != DEFAULT_ANIMAL_STATUS, "status", &animal.status)
            .attribute_if(animal.born >= 0, "born", animal.born)
            .attribute("id", animal.id);
        Ok(write_image(node, fixture))
    }
}

/// Every immortal species, each under its own tag
pub struct ImmortalCodec;

const IMMORTAL_TAGS: &[&str] = &[
    "djinn", "griffin", "minotaur", "ogre", "phoenix", "simurgh", "sphinx", "troll", "centaur", "dragon", "fairy",
    "giant",
];

impl FixtureDecoder for ImmortalCodec {
    fn tags(&self) -> &'static [&'static str] {
        IMMORTAL_TAGS
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let species =
            ImmortalKind::from_tag(&tag.name).ok_or_else(|| MapError::unsupported_tag(&tag.name, tag.line))?;
        let mut immortal = Immortal::new(0, species);
        if species.is_kinded() {
            immortal.kind = get_attribute(tag, "kind")?.to_string();
        }
        immortal.id = get_or_generate_id(tag, ctx)?;
        immortal.image = read_image(tag, species.default_image());
        spin_until_end(tag, stream)?;
        Ok(Fixture::Immortal(immortal))
    }
}

impl FixtureEncoder for ImmortalCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Immortal]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Immortal(immortal) = fixture else {
            return Err(mismatch("immortal", fixture));
        };
        let node = Node::new(immortal.species.tag())
            .attribute_if(immortal.species.is_kinded(), "kind", &immortal.kind)
            .attribute("id", immortal.id);
        Ok(write_image(node, fixture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::codecs::testing::decode_with;
    use crate::model::PlayerCollection;
    use crate::warning::CollectWarnings;

    fn decode(decoder: &dyn FixtureDecoder, xml: &str) -> Result<Fixture> {
        let warner = CollectWarnings::new();
        decode_with(decoder, xml, &PlayerCollection::new(), &warner).map(|(f, _)| f)
    }

    #[test]
    fn test_animal_defaults() {
        let fixture = decode(&AnimalCodec, r#"<animal kind="deer" id="8"/>"#).unwrap();
        assert_eq!(fixture, Fixture::Animal(Animal::new(8, "deer")));
    }

    #[test]
    fn test_animal_full() {
        let fixture = decode(
            &AnimalCodec,
            r#"<animal kind="fox" talking="true" status="domesticated" born="12" id="9"/>"#,
        )
        .unwrap();
        let Fixture::Animal(animal) = fixture else {
            panic!("Expected animal");
        };
        assert!(animal.talking);
        assert_eq!(animal.status, "domesticated");
        assert_eq!(animal.born, 12);
    }

    #[test]
    fn test_animal_encoding_skips_defaults() {
        let node = AnimalCodec.encode(&Fixture::Animal(Animal::new(8, "deer"))).unwrap();
        let names: Vec<&str> = node.attributes().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["kind", "id"]);
    }

    #[test]
    fn test_plain_immortal_ignores_kind() {
        let fixture = decode(&ImmortalCodec, r#"<troll id="2"/>"#).unwrap();
        assert_eq!(fixture, Fixture::Immortal(Immortal::new(2, ImmortalKind::Troll)));
    }

    #[test]
    fn test_kinded_immortal_requires_kind() {
        let result = decode(&ImmortalCodec, r#"<dragon id="3"/>"#);
        assert!(matches!(result, Err(MapError::MissingParameter { ref param, .. }) if param == "kind"));

        let fixture = decode(&ImmortalCodec, r#"<Dragon kind="red" id="3"/>"#).unwrap();
        let Fixture::Immortal(dragon) = fixture else {
            panic!("Expected immortal");
        };
        assert_eq!(dragon.kind, "red");
        assert_eq!(dragon.species, ImmortalKind::Dragon);
    }

    #[test]
    fn test_immortal_encoding_uses_species_tag() {
        let mut giant = Immortal::new(4, ImmortalKind::Giant);
        giant.kind = "hill".to_string();
        let node = ImmortalCodec.encode(&Fixture::Immortal(giant)).unwrap();

        assert_eq!(node.tag(), "giant");
        assert_eq!(node.get_attribute("kind"), Some("hill"));
    }

    #[test]
    fn test_every_species_has_a_tag() {
        for species in ImmortalKind::ALL {
            assert!(IMMORTAL_TAGS.contains(&species.tag()));
        }
    }
}
