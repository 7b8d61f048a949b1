/// Leaf codec contract
///
/// Decoding and encoding are separate capabilities. A codec declares the
/// tags it reads or the fixture kinds it writes; the registries route to
/// it by those declarations.
///
/// A decoder is handed the start tag and must consume the stream through
/// that tag's matching end tag. Leaving tokens behind corrupts every
/// following sibling.

use super::ids::IdFactory;
use super::node::Node;
use super::token::{StartTag, TokenStream};
use crate::error::{MapError, Result};
use crate::model::{Fixture, FixtureKind, PlayerCollection};
use crate::warning::Warning;

/// Per-parse state a decoder may touch
pub struct ReadContext<'a> {
    pub ids: &'a mut IdFactory,
    pub players: &'a PlayerCollection,
    pub warner: &'a dyn Warning,
    /// Format version of the enclosing map
    pub version: u32,
}

impl<'a> ReadContext<'a> {
    pub fn new(ids: &'a mut IdFactory, players: &'a PlayerCollection, warner: &'a dyn Warning, version: u32) -> Self {
        Self {
            ids,
            players,
            warner,
            version,
        }
    }

    pub fn warn(&self, warning: MapError) -> Result<()> {
        self.warner.warn(warning)
    }
}

pub trait FixtureDecoder: Send + Sync {
    /// Lower-case tag names this decoder understands
    fn tags(&self) -> &'static [&'static str];

    fn decode(&self, tag: &StartTag, stream: &mut dyn TokenStream, ctx: &mut ReadContext<'_>) -> Result<Fixture>;

    /// Whether `tag` is legal in maps of `version`
    fn supports_version(&self, _tag: &str, _version: u32) -> bool {
        true
    }
}

pub trait FixtureEncoder: Send + Sync {
    fn kinds(&self) -> &'static [FixtureKind];

    fn encode(&self, fixture: &Fixture) -> Result<Node>;
}

/// Error for an encoder handed a fixture it did not declare
pub(crate) fn mismatch(expected: &str, fixture: &Fixture) -> MapError {
    MapError::EncoderMismatch {
        expected: expected.to_string(),
        actual: fixture.kind().to_string(),
    }
}
