//! Per-name "currently composing" flags.

use std::collections::BTreeMap;
use tracing::trace;

/// Typing flags keyed by participant name.
///
/// Entries are upserted and never expire on their own. A name that was never
/// set reads as not typing.
#[derive(Debug, Default, Clone)]
pub struct TypingState {
    flags: BTreeMap<String, bool>,
}

impl TypingState {
    /// Create an empty typing map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag for `name`, returning the previous value if one existed.
    pub fn set(&mut self, name: impl Into<String>, is_typing: bool) -> Option<bool> {
        let name = name.into();
        trace!(participant = %name, is_typing, "Typing flag updated");
        self.flags.insert(name, is_typing)
    }

    /// Current flag for `name`.
    #[must_use]
    pub fn is_typing(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Drop the entry for `name`.
    pub fn clear(&mut self, name: &str) -> Option<bool> {
        self.flags.remove(name)
    }

    /// Names whose flag is currently set.
    pub fn typing_names(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, typing)| **typing)
            .map(|(name, _)| name.as_str())
    }

    /// All entries, including those set to `false`.
    #[must_use]
    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }
}
