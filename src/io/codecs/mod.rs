/// Leaf codecs, one module per family of entities
///
/// Every codec here is a unit struct implementing `FixtureDecoder`,
/// `FixtureEncoder` or both. `standard_codecs` lists the shipped ones
/// once; `Dispatch::standard` splits that list into its two tables.

pub mod explorable;
pub mod mobile;
pub mod player;
pub mod resource;
pub mod terrain;
pub mod text;
pub mod town;
pub mod unit;

use super::codec::{FixtureDecoder, FixtureEncoder};
use std::sync::Arc;

pub use player::{read_player, write_player};

/// One shipped codec, seen through both of its traits
pub type CodecPair = (Arc<dyn FixtureDecoder>, Arc<dyn FixtureEncoder>);

fn pair<C: FixtureDecoder + FixtureEncoder + 'static>(codec: C) -> CodecPair {
    let codec = Arc::new(codec);
    (codec.clone(), codec)
}

/// Every shipped codec, in registration order
pub fn standard_codecs() -> Vec<CodecPair> {
    vec![
        pair(terrain::MountainCodec),
        pair(terrain::RiverCodec),
        pair(terrain::GroundCodec),
        pair(terrain::ForestCodec),
        pair(terrain::SimpleTerrainCodec),
        pair(mobile::AnimalCodec),
        pair(mobile::ImmortalCodec),
        pair(resource::GroveCodec),
        pair(resource::MeadowCodec),
        pair(resource::MineCodec),
        pair(resource::MineralCodec),
        pair(resource::StoneCodec),
        pair(resource::ShrubCodec),
        pair(resource::CacheCodec),
        pair(unit::UnitCodec),
        pair(unit::FortressCodec),
        pair(town::TownCodec),
        pair(town::VillageCodec),
        pair(explorable::CaveCodec),
        pair(explorable::BattlefieldCodec),
        pair(explorable::PortalCodec),
        pair(explorable::AdventureCodec),
        pair(text::TextCodec),
    ]
}
