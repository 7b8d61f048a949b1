/// Error types for map reading and writing
///
/// Format errors carry the offending tag and the source line so that a
/// broken map can be fixed by hand. The same enum doubles as the payload
/// handed to a warning sink for non-fatal problems.

use thiserror::Error;

/// Main error type for worldmap operations
#[derive(Error, Debug)]
pub enum MapError {
    // ========================================
    // Format Errors
    // ========================================

    #[error("Missing parameter '{param}' in <{tag}> at line {line}")]
    MissingParameter {
        tag: String,
        param: String,
        line: usize,
    },

    #[error("Deprecated parameter '{old}' in <{tag}> at line {line}; use '{preferred}' instead")]
    DeprecatedProperty {
        tag: String,
        old: String,
        preferred: String,
        line: usize,
    },

    #[error("Unexpected child <{child}> in <{parent}> at line {line}")]
    UnwantedChild {
        parent: String,
        child: String,
        line: usize,
    },

    #[error("Unsupported tag <{tag}> at line {line}")]
    UnsupportedTag {
        tag: String,
        line: usize,
    },

    #[error("<{tag}> at line {line} is missing a required child")]
    MissingChild {
        tag: String,
        line: usize,
    },

    #[error("Non-numeric value '{value}' for '{param}' in <{tag}> at line {line}")]
    NumberFormat {
        tag: String,
        param: String,
        value: String,
        line: usize,
    },

    #[error("Invalid value '{value}' for '{param}' in <{tag}> at line {line}")]
    InvalidValue {
        tag: String,
        param: String,
        value: String,
        line: usize,
    },

    #[error("Document ended inside <{tag}> opened at line {line}")]
    UnexpectedEof {
        tag: String,
        line: usize,
    },

    #[error("Document contains no root element")]
    EmptyDocument,

    // ========================================
    // Inclusion Errors
    // ========================================

    #[error("Failed to include '{file}': {source}")]
    Include {
        file: String,
        #[source]
        source: Box<MapError>,
    },

    #[error("File '{file}' includes itself (directly or indirectly)")]
    IncludeCycle {
        file: String,
    },

    #[error("Include depth exceeded {max} while opening '{file}'")]
    IncludeTooDeep {
        file: String,
        max: usize,
    },

    // ========================================
    // Writing Errors
    // ========================================

    #[error("No encoder registered for fixture kind {kind}")]
    MissingEncoder {
        kind: String,
    },

    #[error("Encoder for {expected} was handed a {actual}")]
    EncoderMismatch {
        expected: String,
        actual: String,
    },

    // ========================================
    // Warning Escalation
    // ========================================

    #[error("Warning treated as fatal: {0}")]
    WarningEscalated(Box<MapError>),

    // ========================================
    // IO and Serialization Errors
    // ========================================

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    XmlError(String),
}

/// Result type alias for worldmap operations
pub type Result<T> = std::result::Result<T, MapError>;

impl MapError {
    pub fn missing_parameter(tag: impl Into<String>, param: impl Into<String>, line: usize) -> Self {
        MapError::MissingParameter {
            tag: tag.into(),
            param: param.into(),
            line,
        }
    }

    pub fn unwanted_child(parent: impl Into<String>, child: impl Into<String>, line: usize) -> Self {
        MapError::UnwantedChild {
            parent: parent.into(),
            child: child.into(),
            line,
        }
    }

    pub fn unsupported_tag(tag: impl Into<String>, line: usize) -> Self {
        MapError::UnsupportedTag {
            tag: tag.into(),
            line,
        }
    }

    /// Whether this variant is one readers hand to a warning sink rather
    /// than return
    pub fn is_warning_kind(&self) -> bool {
        matches!(
            self,
            MapError::MissingParameter { .. }
                | MapError::DeprecatedProperty { .. }
                | MapError::UnsupportedTag { .. }
        )
    }

    /// Source line the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            MapError::MissingParameter { line, .. }
            | MapError::DeprecatedProperty { line, .. }
            | MapError::UnwantedChild { line, .. }
            | MapError::UnsupportedTag { line, .. }
            | MapError::MissingChild { line, .. }
            | MapError::NumberFormat { line, .. }
            | MapError::InvalidValue { line, .. }
            | MapError::UnexpectedEof { line, .. } => Some(*line),
            MapError::Include { source, .. } | MapError::WarningEscalated(source) => source.line(),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for MapError {
    fn from(err: quick_xml::Error) -> Self {
        MapError::XmlError(err.to_string())
    }
}

// ========================================
// Unit Tests
// ========================================
