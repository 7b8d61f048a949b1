/// Map document reading and writing
///
/// Reading: `token` → `include` → `reader`, with `dispatch` routing each
/// element inside a tile to its codec. Writing: `writer` builds a `Node`
/// tree through the same dispatch tables and `serialize` lays it out.

pub mod codec;
pub mod codecs;
pub mod dispatch;
pub mod helpers;
pub mod ids;
pub mod include;
pub mod node;
pub mod reader;
pub mod serialize;
pub mod token;
pub mod writer;

// Re-export commonly used types
pub use codec::{FixtureDecoder, FixtureEncoder, ReadContext};
pub use dispatch::{Dispatch, ReaderRegistry, WriterRegistry};
pub use ids::IdFactory;
pub use include::{DocumentOpener, FileOpener, IncludingStream, MemoryOpener};
pub use node::Node;
pub use reader::MapReader;
pub use serialize::NodeSerializer;
pub use token::{Token, TokenStream, XmlTokenSource};
pub use writer::MapWriter;
