/// worldmap - reader and writer for hierarchical world-map documents
///
/// Maps are XML documents: a grid of tiles, each holding terrain features
/// and fixtures, wrapped in a view that records the current turn and
/// player. Documents may pull in other documents with `<include>`.

// Module declarations
pub mod config;
pub mod error;
pub mod io;
pub mod map_file;
pub mod model;
pub mod warning;

// Re-export commonly used types
pub use config::MapIoConfig;
pub use error::{MapError, Result};
pub use io::{Dispatch, MapReader, MapWriter};
pub use map_file::{read_map_file, read_map_str, write_map_file, write_map_string, MapSummary};
pub use model::{Fixture, MapView, WorldMap};
pub use warning::{Warning, WarningPolicy};

/// Initialize logging infrastructure
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::debug!("worldmap logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_dispatch_is_reused() {
        let first = Dispatch::shared() as *const Dispatch;
        let second = Dispatch::shared() as *const Dispatch;
        assert_eq!(first, second);
    }
}
