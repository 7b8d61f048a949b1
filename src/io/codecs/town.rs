/// Settlements: towns, cities, fortifications and villages

use crate::error::{MapError, Result};
use crate::io::codec::{mismatch, FixtureDecoder, FixtureEncoder, ReadContext};
use crate::io::helpers::{
    get_attribute_or, get_enum_attribute, get_int_attribute_or, get_or_generate_id, get_player_or_independent,
    has_attribute, read_image, require_non_empty, spin_until_end, write_image,
};
use crate::io::node::Node;
use crate::io::token::{StartTag, TokenStream};
use crate::model::{Fixture, FixtureKind, Town, TownKind, TownSize, TownStatus, Village};

pub struct TownCodec;

impl FixtureDecoder for TownCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["town", "city", "fortification"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let kind = match tag.lower_name().as_str() {
            "city" => TownKind::City,
            "fortification" => TownKind::Fortification,
            _ => TownKind::Town,
        };
        require_non_empty(tag, "name", false, ctx.warner)?;
        let town = Town {
            kind,
            status: get_enum_attribute(tag, "status", TownStatus::parse)?,
            size: get_enum_attribute(tag, "size", TownSize::parse)?,
            dc: get_int_attribute_or(tag, "dc", 0)?,
            name: get_attribute_or(tag, "name", ""),
            owner: get_player_or_independent(tag, ctx)?,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Town.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Town(town))
    }
}

impl FixtureEncoder for TownCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Town]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Town(town) = fixture else {
            return Err(mismatch("town", fixture));
        };
        let node = Node::new(town.kind.tag())
            .attribute("status", town.status.as_str())
            .attribute("size", town.size.as_str())
            .attribute("dc", town.dc)
            .attribute_if(!town.name.is_empty(), "name", &town.name)
            .attribute("id", town.id)
            .attribute("owner", town.owner.number);
        Ok(write_image(node, fixture))
    }
}

pub struct VillageCodec;

impl FixtureDecoder for VillageCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["village"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        require_non_empty(tag, "name", false, ctx.warner)?;
        let race = if has_attribute(tag, "race") {
            get_attribute_or(tag, "race", "")
        } else {
            ctx.warn(MapError::missing_parameter(&tag.name, "race", tag.line))?;
            "human".to_string()
        };
        let village = Village {
            status: get_enum_attribute(tag, "status", TownStatus::parse)?,
            name: get_attribute_or(tag, "name", ""),
            race,
            owner: get_player_or_independent(tag, ctx)?,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Village.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Village(village))
    }
}

impl FixtureEncoder for VillageCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Village]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Village(village) = fixture else {
            return Err(mismatch("village", fixture));
        };
        let node = Node::new("village")
            .attribute("status", village.status.as_str())
            .attribute_if(!village.name.is_empty(), "name", &village.name)
            .attribute("id", village.id)
            .attribute("owner", village.owner.number)
            .attribute("race", &village.race);
        Ok(write_image(node, fixture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::codecs::testing::decode_with;
    use crate::model::{Player, PlayerCollection};
    use crate::warning::CollectWarnings;

    fn roster() -> PlayerCollection {
        let mut players = PlayerCollection::new();
        players.add(Player::new(2, "Bram"));
        players
    }

    #[test]
    fn test_city_decodes_with_kind_from_tag() {
        let warner = CollectWarnings::new();
        let (fixture, _) = decode_with(
            &TownCodec,
            r#"<city status="active" size="large" dc="25" name="Port" owner="2" id="30"/>"#,
            &roster(),
            &warner,
        )
        .unwrap();

        assert_eq!(
            fixture,
            Fixture::Town(Town {
                id: 30,
                kind: TownKind::City,
                status: TownStatus::Active,
                size: TownSize::Large,
                dc: 25,
                name: "Port".to_string(),
                owner: Player::new(2, "Bram"),
                image: String::new(),
            })
        );
        assert!(warner.is_empty());
    }

    #[test]
    fn test_town_requires_size() {
        let warner = CollectWarnings::new();
        let result = decode_with(
            &TownCodec,
            r#"<town status="burned" name="Ash" owner="2" id="1"/>"#,
            &roster(),
            &warner,
        );
        assert!(matches!(result, Err(MapError::MissingParameter { ref param, .. }) if param == "size"));
    }

    #[test]
    fn test_unnamed_fortification_warns() {
        let warner = CollectWarnings::new();
        let (fixture, _) = decode_with(
            &TownCodec,
            r#"<fortification status="ruined" size="small" owner="2" id="1"/>"#,
            &roster(),
            &warner,
        )
        .unwrap();

        assert_eq!(warner.count(), 1);
        assert_eq!(TownCodec.encode(&fixture).unwrap().tag(), "fortification");
    }

    #[test]
    fn test_village_missing_race_defaults_with_warning() {
        let warner = CollectWarnings::new();
        let (fixture, _) = decode_with(
            &VillageCodec,
            r#"<village status="active" name="Mill" owner="2" id="40"/>"#,
            &roster(),
            &warner,
        )
        .unwrap();
        let Fixture::Village(village) = fixture else {
            panic!("Expected village");
        };

        assert_eq!(village.race, "human");
        assert_eq!(warner.count(), 1);
    }
}
