/// Per-parse entity id bookkeeping
///
/// Ids written in the document are recorded as they are read; entities
/// without one get a fresh id above everything seen so far. One factory
/// lives for exactly one top-level read.

use super::helpers::parse_int;
use super::token::StartTag;
use crate::error::{MapError, Result};
use crate::warning::Warning;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default)]
pub struct IdFactory {
    used: HashSet<u32>,
    /// Smallest value above every id seen so far
    next: u32,
}

impl IdFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id from the document and return it unchanged
    ///
    /// Collisions with earlier ids are not checked.
    pub fn register(&mut self, id: u32) -> u32 {
        self.used.insert(id);
        if id >= self.next {
            self.next = id.saturating_add(1);
        }
        id
    }

    /// A fresh id distinct from every id registered or generated so far
    pub fn generate(&mut self) -> u32 {
        while self.used.contains(&self.next) {
            self.next = self.next.wrapping_add(1);
        }
        let id = self.next;
        self.used.insert(id);
        self.next = id.wrapping_add(1);
        debug!("Generated id {}", id);
        id
    }

    pub fn is_used(&self, id: u32) -> bool {
        self.used.contains(&id)
    }

    /// Register the tag's `id`, or warn and generate one
    pub fn get_or_generate(&mut self, tag: &StartTag, warner: &dyn Warning) -> Result<u32> {
        match tag.attr("id") {
            Some(value) => Ok(self.register(parse_int(tag, "id", value)?)),
            None => {
                warner.warn(MapError::missing_parameter(&tag.name, "id", tag.line))?;
                Ok(self.generate())
            }
        }
    }
}
