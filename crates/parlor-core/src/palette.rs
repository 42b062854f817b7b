//! Presentation colours derived from roster position.

use thiserror::Error;

/// Default participant colours, assigned by position.
pub const DEFAULT_COLORS: [&str; 2] = ["#2a9d8f", "#023e8a"];

/// Colour for authors who are not current participants.
pub const DEFAULT_FALLBACK: &str = "#777";

/// Palette errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    /// No colours were given.
    #[error("Palette must contain at least one colour")]
    Empty,
}

/// A fixed, ordered list of colours plus a neutral fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
    fallback: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| (*c).to_string()).collect(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl Palette {
    /// Create a palette.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Empty`] if `colors` is empty.
    pub fn new(
        colors: impl IntoIterator<Item = impl Into<String>>,
        fallback: impl Into<String>,
    ) -> Result<Self, PaletteError> {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self {
            colors,
            fallback: fallback.into(),
        })
    }

    /// Number of colours, excluding the fallback.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; an empty palette cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The ordered colours.
    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// The fallback colour.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Colour for a roster position, wrapping around the palette.
    #[must_use]
    pub fn at(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    /// Colour for `name` given the current roster order.
    #[must_use]
    pub fn color_for(&self, participants: &[String], name: &str) -> &str {
        participants
            .iter()
            .position(|p| p == name)
            .map_or(self.fallback(), |index| self.at(index))
    }
}
