/// Configuration for reading and writing map files
///
/// Every field has a default so that a config file only needs to mention
/// what it changes.

use crate::error::{MapError, Result};
use crate::warning::WarningPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Reader and writer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapIoConfig {
    /// What to do with non-fatal format problems
    pub warning_policy: WarningPolicy,

    /// Character repeated for each indent level on write
    pub indent_char: char,

    /// How many `indent_char`s make one level
    pub indent_size: usize,

    /// Emit `<?xml ...?>` at the top of written documents
    pub xml_declaration: bool,

    /// Maximum nesting of `<include>` files
    pub max_include_depth: usize,
}

impl Default for MapIoConfig {
    fn default() -> Self {
        Self {
            warning_policy: WarningPolicy::Warn,
            indent_char: ' ',
            indent_size: 4,
            xml_declaration: true,
            max_include_depth: 16,
        }
    }
}

impl MapIoConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapIoConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MapError::FileNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.indent_char.is_ascii_whitespace() {
            return Err(MapError::InvalidValue {
                tag: "config".to_string(),
                param: "indent_char".to_string(),
                value: self.indent_char.to_string(),
                line: 0,
            });
        }
        if self.max_include_depth == 0 {
            return Err(MapError::InvalidValue {
                tag: "config".to_string(),
                param: "max_include_depth".to_string(),
                value: "0".to_string(),
                line: 0,
            });
        }
        Ok(())
    }

    /// Indent character as the single byte the XML writer wants
    pub fn indent_byte(&self) -> u8 {
        // validate() restricts indent_char to ASCII whitespace
        self.indent_char as u8
    }
}
