//! Ordered participant list.
//!
//! Order is join order and is observable: presentation colours are derived
//! from a participant's position, so removing an earlier entry shifts every
//! later one.

use tracing::debug;

/// The participants currently present in a room, in join order.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, counting duplicates.
    #[must_use]
    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Check if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check if a name is present.
    #[must_use]
    pub fn is_present(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Position of the first entry with this name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Append a name. Duplicates are not checked here.
    pub fn push(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!(participant = %name, position = self.names.len(), "Roster: appended");
        self.names.push(name);
    }

    /// Remove the first entry with this name.
    ///
    /// Returns the index it was removed from, if any.
    pub fn remove_first(&mut self, name: &str) -> Option<usize> {
        let index = self.index_of(name)?;
        self.names.remove(index);
        debug!(participant = %name, position = index, "Roster: removed");
        Some(index)
    }

    /// Names in join order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
