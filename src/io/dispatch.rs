/// Tag and kind dispatch tables
///
/// `ReaderRegistry` routes a (case-insensitive) tag name to its decoder,
/// `WriterRegistry` routes a `FixtureKind` to its encoder. Both are built
/// once and only read afterwards, so one `Dispatch` can serve any number
/// of parses.

use super::codec::{FixtureDecoder, FixtureEncoder, ReadContext};
use super::codecs;
use super::node::Node;
use super::token::{StartTag, TokenStream};
use crate::error::{MapError, Result};
use crate::model::{Fixture, FixtureKind};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tag name → decoder
#[derive(Default, Clone)]
pub struct ReaderRegistry {
    decoders: HashMap<String, Arc<dyn FixtureDecoder>>,
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder under every tag it declares
    ///
    /// A tag that is already taken moves to the new decoder.
    pub fn register(&mut self, decoder: Arc<dyn FixtureDecoder>) {
        for tag in decoder.tags() {
            let key = tag.to_lowercase();
            if self.decoders.insert(key, decoder.clone()).is_some() {
                warn!("Tag <{}> registered twice; keeping the later decoder", tag);
            }
        }
    }

    pub fn has(&self, tag: &str) -> bool {
        self.decoders.contains_key(&tag.to_lowercase())
    }

    pub fn get(&self, tag: &str) -> Option<&dyn FixtureDecoder> {
        self.decoders.get(&tag.to_lowercase()).map(|d| d.as_ref())
    }

    /// Registered tag names (sorted)
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<_> = self.decoders.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Decode the element `tag` opens
    pub fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        let name = tag.lower_name();
        let decoder = self
            .decoders
            .get(&name)
            .ok_or_else(|| MapError::unsupported_tag(&tag.name, tag.line))?;
        if !decoder.supports_version(&name, ctx.version) {
            ctx.warn(MapError::unsupported_tag(&tag.name, tag.line))?;
        }
        debug!("Decoding <{}> at line {}", tag.name, tag.line);
        decoder.decode(tag, stream, ctx)
    }
}

/// Fixture kind → encoder
#[derive(Default, Clone)]
pub struct WriterRegistry {
    encoders: HashMap<FixtureKind, Arc<dyn FixtureEncoder>>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, encoder: Arc<dyn FixtureEncoder>) {
        for kind in encoder.kinds() {
            if self.encoders.insert(*kind, encoder.clone()).is_some() {
                warn!("Fixture kind {} registered twice; keeping the later encoder", kind);
            }
        }
    }

    pub fn has(&self, kind: FixtureKind) -> bool {
        self.encoders.contains_key(&kind)
    }

    pub fn encode(&self, fixture: &Fixture) -> Result<Node> {
        let kind = fixture.kind();
        let encoder = self.encoders.get(&kind).ok_or_else(|| MapError::MissingEncoder {
            kind: kind.to_string(),
        })?;
        encoder.encode(fixture)
    }
}

/// Both registries, handed to every reader and writer
#[derive(Default, Clone)]
pub struct Dispatch {
    pub readers: ReaderRegistry,
    pub writers: WriterRegistry,
}

static SHARED: Lazy<Dispatch> = Lazy::new(Dispatch::standard);

impl Dispatch {
    pub fn new(readers: ReaderRegistry, writers: WriterRegistry) -> Self {
        Self { readers, writers }
    }

    /// Tables for every codec this crate ships
    pub fn standard() -> Self {
        let mut readers = ReaderRegistry::new();
        let mut writers = WriterRegistry::new();
        for (decoder, encoder) in codecs::standard_codecs() {
            readers.register(decoder);
            writers.register(encoder);
        }
        debug!("Built standard dispatch with {} tags", readers.decoders.len());
        Self { readers, writers }
    }

    /// Process-wide standard tables, built on first use
    pub fn shared() -> &'static Dispatch {
        &SHARED
    }

    pub fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture> {
        self.readers.decode(tag, stream, ctx)
    }

    pub fn encode(&self, fixture: &Fixture) -> Result<Node> {
        self.writers.encode(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ids::IdFactory;
    use crate::io::token::{EndTag, Token, VecTokenStream};
    use crate::model::{PlayerCollection, SimpleTerrain};
    use crate::warning::CollectWarnings;

    struct Dummy(&'static [&'static str]);

    impl FixtureDecoder for Dummy {
        fn tags(&self) -> &'static [&'static str] {
            self.0
        }

        fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, _ctx: &mut ReadContext<'_>) -> Result<Fixture> {
            crate::io::helpers::spin_until_end(tag, stream)?;
            Ok(Fixture::Hill(SimpleTerrain::new(self.0.len() as u32)))
        }
    }

    fn stream_for(name: &str) -> VecTokenStream {
        VecTokenStream::new(vec![Token::End(EndTag { name: name.into(), line: 1 })], "mem")
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dispatch = Dispatch::standard();
        assert!(dispatch.readers.has("SANDBAR"));
        assert!(dispatch.readers.get("Unit").is_some());
    }

    #[test]
    fn test_unknown_tag_is_unsupported_with_line() {
        let dispatch = Dispatch::standard();
        let mut ids = IdFactory::new();
        let players = PlayerCollection::new();
        let warner = CollectWarnings::new();
        let mut ctx = ReadContext::new(&mut ids, &players, &warner, 2);
        let tag = StartTag::new("wyvern", 17);

        let err = dispatch.decode(&tag, &mut stream_for("wyvern"), &mut ctx).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedTag { ref tag, line: 17 } if tag == "wyvern"));
    }

    #[test]
    fn test_duplicate_registration_keeps_last() {
        let mut registry = ReaderRegistry::new();
        registry.register(Arc::new(Dummy(&["hill"])));
        registry.register(Arc::new(Dummy(&["hill", "oasis"])));

        let mut ids = IdFactory::new();
        let players = PlayerCollection::new();
        let warner = CollectWarnings::new();
        let mut ctx = ReadContext::new(&mut ids, &players, &warner, 2);
        let fixture = registry
            .decode(&StartTag::new("Hill", 1), &mut stream_for("Hill"), &mut ctx)
            .unwrap();

        assert_eq!(fixture.id(), Some(2));
        assert_eq!(registry.tags(), vec!["hill".to_string(), "oasis".to_string()]);
    }

    #[test]
    fn test_missing_encoder() {
        let writers = WriterRegistry::new();
        let result = writers.encode(&Fixture::Mountain);

        assert!(matches!(result, Err(MapError::MissingEncoder { .. })));
    }

    #[test]
    fn test_standard_covers_every_kind() {
        let dispatch = Dispatch::shared();
        let kinds = [
            FixtureKind::Mountain,
            FixtureKind::River,
            FixtureKind::Ground,
            FixtureKind::Forest,
            FixtureKind::Hill,
            FixtureKind::Oasis,
            FixtureKind::Sandbar,
            FixtureKind::Animal,
            FixtureKind::Immortal,
            FixtureKind::Grove,
            FixtureKind::Meadow,
            FixtureKind::Mine,
            FixtureKind::Mineral,
            FixtureKind::Stone,
            FixtureKind::Shrub,
            FixtureKind::Cache,
            FixtureKind::Unit,
            FixtureKind::Fortress,
            FixtureKind::Town,
            FixtureKind::Village,
            FixtureKind::Cave,
            FixtureKind::Battlefield,
            FixtureKind::Portal,
            FixtureKind::Adventure,
            FixtureKind::Text,
        ];
        for kind in kinds {
            assert!(dispatch.writers.has(kind), "no encoder for {}", kind);
        }
    }

    #[test]
    fn test_version_gate_warns_but_decodes() {
        let dispatch = Dispatch::standard();
        let mut ids = IdFactory::new();
        let players = PlayerCollection::new();
        let warner = CollectWarnings::new();
        let mut ctx = ReadContext::new(&mut ids, &players, &warner, 1);

        let fixture = dispatch
            .decode(&StartTag::new("mountain", 3), &mut stream_for("mountain"), &mut ctx)
            .unwrap();
        assert_eq!(fixture, Fixture::Mountain);
        assert_eq!(warner.count(), 1);
    }
}
