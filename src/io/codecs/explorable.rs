/// Things to explore: caves, battlefields, portals and adventure hooks

use crate::error::Result;
use crate::io::codec::{mismatch, FixtureDecoder, FixtureEncoder, ReadContext};
use crate::io::helpers::{
    get_attribute, get_attribute_or, get_int_attribute, get_int_attribute_or, get_or_generate_id,
    get_player_or_independent, has_attribute, read_image, spin_until_end, write_image,
};
use crate::io::node::Node;
use crate::io::token::{StartTag, TokenStream};
use crate::model::{Adventure, Battlefield, Cave, Fixture, FixtureKind, Point, Portal};

pub struct CaveCodec;

impl FixtureDecoder for CaveCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["cave"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let cave = Cave {
            dc: get_int_attribute(tag, "dc")?,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Cave.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Cave(cave))
    }
}

impl FixtureEncoder for CaveCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Cave]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Cave(cave) = fixture else {
            return Err(mismatch("cave", fixture));
        };
        Ok(write_image(Node::new("cave").attribute("dc", cave.dc).attribute("id", cave.id), fixture))
    }
}

pub struct BattlefieldCodec;

impl FixtureDecoder for BattlefieldCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["battlefield"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let battlefield = Battlefield {
            dc: get_int_attribute(tag, "dc")?,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Battlefield.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Battlefield(battlefield))
    }
}

impl FixtureEncoder for BattlefieldCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Battlefield]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Battlefield(battlefield) = fixture else {
            return Err(mismatch("battlefield", fixture));
        };
        let node = Node::new("battlefield")
            .attribute("dc", battlefield.dc)
            .attribute("id", battlefield.id);
        Ok(write_image(node, fixture))
    }
}

/// A portal to another world; the far end may not be known yet
pub struct PortalCodec;

impl FixtureDecoder for PortalCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["portal"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let portal = Portal {
            destination_world: get_attribute(tag, "world")?.to_string(),
            destination: Point::new(
                get_int_attribute_or(tag, "row", -1)?,
                get_int_attribute_or(tag, "column", -1)?,
            ),
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Portal.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Portal(portal))
    }
}

impl FixtureEncoder for PortalCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Portal]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Portal(portal) = fixture else {
            return Err(mismatch("portal", fixture));
        };
        let node = Node::new("portal")
            .attribute("world", &portal.destination_world)
            .attribute("row", portal.destination.row)
            .attribute("column", portal.destination.column)
            .attribute("id", portal.id);
        Ok(write_image(node, fixture))
    }
}

pub struct AdventureCodec;

impl FixtureDecoder for AdventureCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["adventure"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        // Unclaimed adventures simply omit the owner
        let owner = if has_attribute(tag, "owner") {
            get_player_or_independent(tag, ctx)?
        } else {
            ctx.players.independent()
        };
        let adventure = Adventure {
            brief: get_attribute_or(tag, "brief", ""),
            full: get_attribute_or(tag, "full", ""),
            owner,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Adventure.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Adventure(adventure))
    }
}

impl FixtureEncoder for AdventureCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Adventure]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Adventure(adventure) = fixture else {
            return Err(mismatch("adventure", fixture));
        };
        let node = Node::new("adventure")
            .attribute("id", adventure.id)
            .attribute_if(!adventure.owner.is_independent(), "owner", adventure.owner.number)
            .attribute_if(!adventure.brief.is_empty(), "brief", &adventure.brief)
            .attribute_if(!adventure.full.is_empty(), "full", &adventure.full);
        Ok(write_image(node, fixture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;
    use crate::io::codecs::testing::decode_with;
    use crate::model::{Player, PlayerCollection};
    use crate::warning::CollectWarnings;

    fn decode(decoder: &dyn FixtureDecoder, xml: &str) -> (Result<Fixture>, CollectWarnings) {
        let warner = CollectWarnings::new();
        let mut players = PlayerCollection::new();
        players.add(Player::new(3, "Cyd"));
        let result = decode_with(decoder, xml, &players, &warner).map(|(f, _)| f);
        (result, warner)
    }

    #[test]
    fn test_cave_and_battlefield() {
        let (cave, _) = decode(&CaveCodec, r#"<cave dc="15" id="1"/>"#);
        let (field, _) = decode(&BattlefieldCodec, r#"<battlefield dc="10" id="2"/>"#);

        assert_eq!(
            cave.unwrap(),
            Fixture::Cave(Cave {
                id: 1,
                dc: 15,
                image: String::new(),
            })
        );
        assert!(matches!(field.unwrap(), Fixture::Battlefield(Battlefield { dc: 10, .. })));
    }

    #[test]
    fn test_cave_bad_dc() {
        let (result, _) = decode(&CaveCodec, r#"<cave dc="hard" id="1"/>"#);
        assert!(matches!(result, Err(MapError::NumberFormat { .. })));
    }

    #[test]
    fn test_portal_unknown_destination() {
        let (fixture, warner) = decode(&PortalCodec, r#"<portal world="underworld" id="5"/>"#);
        let Fixture::Portal(portal) = fixture.unwrap() else {
            panic!("Expected portal");
        };

        assert_eq!(portal.destination, Point::INVALID);
        assert_eq!(portal.destination_world, "underworld");
        assert!(warner.is_empty());
    }

    #[test]
    fn test_adventure_owner_optional() {
        let (unowned, warner) = decode(&AdventureCodec, r#"<adventure brief="Ruins" full="Old ruins" id="6"/>"#);
        let (owned, _) = decode(&AdventureCodec, r#"<adventure brief="Ruins" owner="3" id="7"/>"#);

        let Fixture::Adventure(unowned) = unowned.unwrap() else {
            panic!("Expected adventure");
        };
        let Fixture::Adventure(owned) = owned.unwrap() else {
            panic!("Expected adventure");
        };
        assert!(unowned.owner.is_independent());
        assert!(warner.is_empty());
        assert_eq!(owned.owner.name, "Cyd");
    }

    #[test]
    fn test_adventure_encoding_skips_empty_fields() {
        let adventure = Adventure {
            id: 6,
            brief: "Ruins".to_string(),
            full: String::new(),
            owner: Player::independent(),
            image: String::new(),
        };
        let node = AdventureCodec.encode(&Fixture::Adventure(adventure)).unwrap();

        assert_eq!(node.get_attribute("owner"), None);
        assert_eq!(node.get_attribute("full"), None);
        assert_eq!(node.get_attribute("brief"), Some("Ruins"));
    }
}
