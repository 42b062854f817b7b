//! Read-only views of a room delivered to subscribers.

use crate::message::Message;
use crate::palette::Palette;
use crate::state::RoomState;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Participants, timeline and typing flags at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSnapshot {
    /// Participant names in join order.
    pub participants: Vec<String>,
    /// Timeline, oldest first.
    pub messages: Vec<Message>,
    /// Every typing flag that has been set.
    pub typing: BTreeMap<String, bool>,
    #[serde(skip)]
    palette: Arc<Palette>,
}

impl RoomSnapshot {
    pub(crate) fn capture(state: &RoomState, palette: Arc<Palette>) -> Self {
        Self {
            participants: state.participants().to_vec(),
            messages: state.messages().to_vec(),
            typing: state.typing().flags().clone(),
            palette,
        }
    }

    /// Whether `name` is flagged as typing.
    #[must_use]
    pub fn is_typing(&self, name: &str) -> bool {
        self.typing.get(name).copied().unwrap_or(false)
    }

    /// Colour for `name` at the time of the snapshot.
    #[must_use]
    pub fn color_for(&self, name: &str) -> &str {
        self.palette.color_for(&self.participants, name)
    }

    /// The palette colours were derived from.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The most recent message.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
