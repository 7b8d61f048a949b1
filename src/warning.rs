/// Warning sinks for non-fatal format problems
///
/// Readers never decide on their own whether a recoverable problem should
/// stop a parse. They hand it to a `Warning` implementation, which may log
/// it, drop it, record it, or turn it into an error.

use crate::error::{MapError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use tracing::{debug, warn};

/// Receiver for non-fatal format issues
#[cfg_attr(test, mockall::automock)]
pub trait Warning {
    /// Report a warning; an `Err` aborts the current parse
    fn warn(&self, warning: MapError) -> Result<()>;
}

/// Logs each warning through `tracing` and carries on
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWarning;

impl Warning for LogWarning {
    fn warn(&self, warning: MapError) -> Result<()> {
        warn!("{}", warning);
        Ok(())
    }
}

/// Drops every warning
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreWarning;

impl Warning for IgnoreWarning {
    fn warn(&self, warning: MapError) -> Result<()> {
        debug!("Ignoring warning: {}", warning);
        Ok(())
    }
}

/// Turns every warning into a fatal error
#[derive(Debug, Default, Clone, Copy)]
pub struct DieWarning;

impl Warning for DieWarning {
    fn warn(&self, warning: MapError) -> Result<()> {
        Err(MapError::WarningEscalated(Box::new(warning)))
    }
}

/// Records warnings for later inspection
#[derive(Debug, Default)]
pub struct CollectWarnings {
    warnings: RefCell<Vec<MapError>>,
}

impl CollectWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.warnings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.borrow().is_empty()
    }

    /// Rendered messages of everything collected so far
    pub fn messages(&self) -> Vec<String> {
        self.warnings.borrow().iter().map(|w| w.to_string()).collect()
    }

    pub fn into_inner(self) -> Vec<MapError> {
        self.warnings.into_inner()
    }
}

impl Warning for CollectWarnings {
    fn warn(&self, warning: MapError) -> Result<()> {
        debug!("Collected warning: {}", warning);
        self.warnings.borrow_mut().push(warning);
        Ok(())
    }
}

/// Which sink a configuration asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WarningPolicy {
    #[default]
    Warn,
    Ignore,
    Die,
}

impl WarningPolicy {
    pub fn sink(self) -> Box<dyn Warning> {
        match self {
            WarningPolicy::Warn => Box::new(LogWarning),
            WarningPolicy::Ignore => Box::new(IgnoreWarning),
            WarningPolicy::Die => Box::new(DieWarning),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MapError {
        MapError::missing_parameter("hill", "id", 2)
    }

    #[test]
    fn test_log_warning_continues() {
        assert!(LogWarning.warn(sample()).is_ok());
    }

    #[test]
    fn test_ignore_warning_continues() {
        assert!(IgnoreWarning.warn(sample()).is_ok());
    }

    #[test]
    fn test_die_warning_escalates() {
        let result = DieWarning.warn(sample());

        assert!(matches!(result, Err(MapError::WarningEscalated(_))));
    }

    #[test]
    fn test_collect_warnings_records_in_order() {
        let sink = CollectWarnings::new();
        sink.warn(sample()).unwrap();
        sink.warn(MapError::unsupported_tag("mountain", 9)).unwrap();

        assert_eq!(sink.count(), 2);
        let messages = sink.messages();
        assert!(messages[0].contains("hill"));
        assert!(messages[1].contains("mountain"));
    }

    #[test]
    fn test_policy_value_names() {
        assert_eq!(WarningPolicy::from_str("DIE", true), Ok(WarningPolicy::Die));
        assert_eq!(WarningPolicy::from_str("ignore", false), Ok(WarningPolicy::Ignore));
        assert!(WarningPolicy::from_str("loud", true).is_err());
    }

    #[test]
    fn test_policy_sink_die() {
        let sink = WarningPolicy::Die.sink();
        assert!(sink.warn(sample()).is_err());
    }

    #[test]
    fn test_policy_json_names() {
        let policy: WarningPolicy = serde_json::from_str("\"ignore\"").unwrap();
        assert_eq!(policy, WarningPolicy::Ignore);
    }
}
