/// Harvestable resources: groves, meadows, mines, minerals, stone, shrubs
/// and caches

use crate::error::{MapError, Result};
use crate::io::codec::{mismatch, FixtureDecoder, FixtureEncoder, ReadContext};
use crate::io::helpers::{
    get_attr_with_deprecated, get_attribute, get_bool_attribute, get_enum_attribute, get_int_attribute,
    get_or_generate_id, has_attribute, read_image, spin_until_end, write_image,
};
use crate::io::node::Node;
use crate::io::token::{StartTag, TokenStream};
use crate::model::{
    CacheFixture, FieldStatus, Fixture, FixtureKind, Grove, Meadow, Mine, Mineral, Shrub, Stone, TownStatus,
};

pub struct GroveCodec;

impl GroveCodec {
    /// `cultivated`, or the inverse of the old `wild` flag
    fn cultivated(tag: &StartTag, ctx: &ReadContext<'_>) -> Result<bool> {
        if has_attribute(tag, "cultivated") {
            return get_bool_attribute(tag, "cultivated");
        }
        if has_attribute(tag, "wild") {
            ctx.warn(MapError::DeprecatedProperty {
                tag: tag.name.clone(),
                old: "wild".to_string(),
                preferred: "cultivated".to_string(),
                line: tag.line,
            })?;
            return Ok(!get_bool_attribute(tag, "wild")?);
        }
        Err(MapError::missing_parameter(&tag.name, "cultivated", tag.line))
    }
}

impl FixtureDecoder for GroveCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["grove", "orchard"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let cultivated = Self::cultivated(tag, ctx)?;
        let kind = get_attr_with_deprecated(tag, "kind", "tree", ctx.warner)?;
        let grove = Grove {
            id: get_or_generate_id(tag, ctx)?,
            kind,
            cultivated,
            orchard: tag.is("orchard"),
            image: read_image(tag, FixtureKind::Grove.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Grove(grove))
    }
}

impl FixtureEncoder for GroveCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Grove]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Grove(grove) = fixture else {
            return Err(mismatch("grove", fixture));
        };
        let node = Node::new(if grove.orchard { "orchard" } else { "grove" })
            .attribute("cultivated", grove.cultivated)
            .attribute("kind", &grove.kind)
            .attribute("id", grove.id);
        Ok(write_image(node, fixture))
    }
}

pub struct MeadowCodec;

impl FixtureDecoder for MeadowCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["meadow", "field"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let status = if has_attribute(tag, "status") {
            get_enum_attribute(tag, "status", FieldStatus::parse)?
        } else {
            ctx.warn(MapError::missing_parameter(&tag.name, "status", tag.line))?;
            FieldStatus::Fallow
        };
        let meadow = Meadow {
            kind: get_attribute(tag, "kind")?.to_string(),
            cultivated: get_bool_attribute(tag, "cultivated")?,
            status,
            field: tag.is("field"),
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Meadow.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Meadow(meadow))
    }
}

impl FixtureEncoder for MeadowCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Meadow]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Meadow(meadow) = fixture else {
            return Err(mismatch("meadow", fixture));
        };
        let node = Node::new(if meadow.field { "field" } else { "meadow" })
            .attribute("kind", &meadow.kind)
            .attribute("cultivated", meadow.cultivated)
            .attribute("status", meadow.status.as_str())
            .attribute("id", meadow.id);
        Ok(write_image(node, fixture))
    }
}

pub struct MineCodec;

impl FixtureDecoder for MineCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["mine"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let mine = Mine {
            kind: get_attribute(tag, "kind")?.to_string(),
            status: get_enum_attribute(tag, "status", TownStatus::parse)?,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Mine.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Mine(mine))
    }
}

impl FixtureEncoder for MineCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Mine]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Mine(mine) = fixture else {
            return Err(mismatch("mine", fixture));
        };
        let node = Node::new("mine")
            .attribute("kind", &mine.kind)
            .attribute("status", mine.status.as_str())
            .attribute("id", mine.id);
        Ok(write_image(node, fixture))
    }
}

pub struct MineralCodec;

impl FixtureDecoder for MineralCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["mineral"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let mineral = Mineral {
            kind: get_attr_with_deprecated(tag, "kind", "mineral", ctx.warner)?,
            exposed: get_bool_attribute(tag, "exposed")?,
            dc: get_int_attribute(tag, "dc")?,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Mineral.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Mineral(mineral))
    }
}

impl FixtureEncoder for MineralCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Mineral]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Mineral(mineral) = fixture else {
            return Err(mismatch("mineral", fixture));
        };
        let node = Node::new("mineral")
            .attribute("kind", &mineral.kind)
            .attribute("exposed", mineral.exposed)
            .attribute("dc", mineral.dc)
            .attribute("id", mineral.id);
        Ok(write_image(node, fixture))
    }
}

pub struct StoneCodec;

impl FixtureDecoder for StoneCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["stone"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let stone = Stone {
            kind: get_attr_with_deprecated(tag, "kind", "stone", ctx.warner)?,
            dc: get_int_attribute(tag, "dc")?,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Stone.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Stone(stone))
    }
}

impl FixtureEncoder for StoneCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Stone]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Stone(stone) = fixture else {
            return Err(mismatch("stone", fixture));
        };
        let node = Node::new("stone")
            .attribute("kind", &stone.kind)
            .attribute("dc", stone.dc)
            .attribute("id", stone.id);
        Ok(write_image(node, fixture))
    }
}

pub struct ShrubCodec;

impl FixtureDecoder for ShrubCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["shrub"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let shrub = Shrub {
            kind: get_attr_with_deprecated(tag, "kind", "shrub", ctx.warner)?,
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Shrub.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Shrub(shrub))
    }
}

impl FixtureEncoder for ShrubCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Shrub]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Shrub(shrub) = fixture else {
            return Err(mismatch("shrub", fixture));
        };
        let node = Node::new("shrub").attribute("kind", &shrub.kind).attribute("id", shrub.id);
        Ok(write_image(node, fixture))
    }
}

pub struct CacheCodec;

impl FixtureDecoder for CacheCodec {
    fn tags(&self) -> &'static [&'static str] {
        &["cache"]
    }

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let cache = CacheFixture {
            kind: get_attribute(tag, "kind")?.to_string(),
            contents: get_attribute(tag, "contents")?.to_string(),
            id: get_or_generate_id(tag, ctx)?,
            image: read_image(tag, FixtureKind::Cache.default_image()),
        };
        spin_until_end(tag, stream)?;
        Ok(Fixture::Cache(cache))
    }
}

impl FixtureEncoder for CacheCodec {
    fn kinds(&self) -> &'static [FixtureKind] {
        &[FixtureKind::Cache]
    }

    fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let Fixture::Cache(cache) = fixture else {
            return Err(mismatch("cache", fixture));
        };
        let node = Node::new("cache")
            .attribute("kind", &cache.kind)
            .attribute("contents", &cache.contents)
            .attribute("id", cache.id);
        Ok(write_image(node, fixture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::codecs::testing::decode_with;
    use crate::model::PlayerCollection;
    use crate::warning::{CollectWarnings, MockWarning};

    fn decode(decoder: &dyn FixtureDecoder, xml: &str) -> (Result<Fixture>, CollectWarnings) {
        let warner = CollectWarnings::new();
        let result = decode_with(decoder, xml, &PlayerCollection::new(), &warner).map(|(f, _)| f);
        (result, warner)
    }

    // ========================================
    // Groves
    // ========================================

    #[test]
    fn test_grove_current_attributes() {
        let mut warner = MockWarning::new();
        warner.expect_warn().times(0);
        let (fixture, _) = decode_with(
            &GroveCodec,
            r#"<orchard cultivated="true" kind="apple" id="5"/>"#,
            &PlayerCollection::new(),
            &warner,
        )
        .unwrap();

        assert_eq!(
            fixture,
            Fixture::Grove(Grove {
                id: 5,
                kind: "apple".to_string(),
                cultivated: true,
                orchard: true,
                image: String::new(),
            })
        );
    }

    #[test]
    fn test_grove_deprecated_attributes_warn_each() {
        let (fixture, warner) = decode(&GroveCodec, r#"<grove wild="true" tree="elm" id="6"/>"#);
        let Fixture::Grove(grove) = fixture.unwrap() else {
            panic!("Expected grove");
        };

        assert!(!grove.cultivated);
        assert_eq!(grove.kind, "elm");
        assert!(!grove.orchard);
        assert_eq!(warner.count(), 2);
    }

    #[test]
    fn test_grove_without_cultivation_is_fatal() {
        let (result, _) = decode(&GroveCodec, r#"<grove kind="elm" id="6"/>"#);
        assert!(matches!(result, Err(MapError::MissingParameter { ref param, .. }) if param == "cultivated"));
    }

    // ========================================
    // Meadows
    // ========================================

    #[test]
    fn test_meadow_missing_status_warns_and_defaults() {
        let (fixture, warner) = decode(&MeadowCodec, r#"<field kind="wheat" cultivated="true" id="1"/>"#);
        let Fixture::Meadow(meadow) = fixture.unwrap() else {
            panic!("Expected meadow");
        };

        assert_eq!(meadow.status, FieldStatus::Fallow);
        assert!(meadow.field);
        assert_eq!(warner.count(), 1);
    }

    #[test]
    fn test_meadow_bad_status() {
        let (result, _) = decode(&MeadowCodec, r#"<meadow kind="grass" cultivated="false" status="wilted" id="1"/>"#);
        assert!(matches!(result, Err(MapError::InvalidValue { ref value, .. }) if value == "wilted"));
    }

    // ========================================
    // Mines, minerals, stone, shrubs, caches
    // ========================================

    #[test]
    fn test_mine() {
        let (fixture, warner) = decode(&MineCodec, r#"<mine kind="iron" status="abandoned" id="2"/>"#);
        assert_eq!(
            fixture.unwrap(),
            Fixture::Mine(Mine {
                id: 2,
                kind: "iron".to_string(),
                status: TownStatus::Abandoned,
                image: String::new(),
            })
        );
        assert!(warner.is_empty());
    }

    #[test]
    fn test_mineral_deprecated_kind() {
        let (fixture, warner) = decode(&MineralCodec, r#"<mineral mineral="gold" exposed="false" dc="20" id="3"/>"#);
        let Fixture::Mineral(mineral) = fixture.unwrap() else {
            panic!("Expected mineral");
        };

        assert_eq!(mineral.kind, "gold");
        assert_eq!(mineral.dc, 20);
        assert_eq!(warner.count(), 1);
    }

    #[test]
    fn test_stone_requires_dc() {
        let (result, _) = decode(&StoneCodec, r#"<stone kind="granite" id="3"/>"#);
        assert!(matches!(result, Err(MapError::MissingParameter { ref param, .. }) if param == "dc"));
    }

    #[test]
    fn test_shrub_deprecated_kind() {
        let (fixture, warner) = decode(&ShrubCodec, r#"<shrub shrub="hazel" id="4"/>"#);
        assert_eq!(
            fixture.unwrap(),
            Fixture::Shrub(Shrub {
                id: 4,
                kind: "hazel".to_string(),
                image: String::new(),
            })
        );
        assert_eq!(warner.count(), 1);
    }

    #[test]
    fn test_cache_encoding() {
        let cache = CacheFixture {
            id: 9,
            kind: "gold".to_string(),
            contents: "coins".to_string(),
            image: "chest.png".to_string(),
        };
        let node = CacheCodec.encode(&Fixture::Cache(cache)).unwrap();

        assert_eq!(node.get_attribute("contents"), Some("coins"));
        assert_eq!(node.get_attribute("image"), Some("chest.png"));
    }

    #[test]
    fn test_encoders_use_variant_tag() {
        let grove = Grove {
            id: 1,
            kind: "oak".to_string(),
            cultivated: false,
            orchard: false,
            image: String::new(),
        };
        assert_eq!(GroveCodec.encode(&Fixture::Grove(grove)).unwrap().tag(), "grove");
        assert!(MeadowCodec.encode(&Fixture::Mountain).is_err());
    }
}
