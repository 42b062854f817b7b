//! Timeline entries.
//!
//! A [`Message`] is immutable once created. Join and leave notices are
//! ordinary messages with a reserved body and a distinguishing [`MessageKind`].

use crate::clock::Millis;
use serde::{Deserialize, Serialize};

/// Position of a message in its room's timeline.
///
/// Ids are assigned in insertion order starting at zero and never reused, so
/// they stay unique when two messages share a timestamp.
pub type MessageId = u64;

/// Body of the notice appended when a participant joins.
pub const JOINED_BODY: &str = "Joined";

/// Body of the notice appended when a participant leaves.
pub const LEFT_BODY: &str = "Left";

/// What produced a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Synthetic notice for a join.
    Joined,
    /// Synthetic notice for a leave.
    Left,
    /// Text posted by an author.
    Text,
}

/// A single timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sequence id within the room.
    pub id: MessageId,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: Millis,
    /// Author name. Need not be a current participant.
    pub author: String,
    /// Message body, recorded verbatim.
    pub body: String,
    /// Entry kind.
    pub kind: MessageKind,
}

impl Message {
    /// Create a text message.
    #[must_use]
    pub fn text(
        id: MessageId,
        timestamp: Millis,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            author: author.into(),
            body: body.into(),
            kind: MessageKind::Text,
        }
    }

    /// Create a join notice for `author`.
    #[must_use]
    pub fn joined(id: MessageId, timestamp: Millis, author: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Joined,
            ..Self::text(id, timestamp, author, JOINED_BODY)
        }
    }

    /// Create a leave notice for `author`.
    #[must_use]
    pub fn left(id: MessageId, timestamp: Millis, author: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Left,
            ..Self::text(id, timestamp, author, LEFT_BODY)
        }
    }

    /// Whether this entry is a join or leave notice.
    #[must_use]
    pub fn is_notice(&self) -> bool {
        self.kind != MessageKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_bodies() {
        let joined = Message::joined(0, 1, "Alice");
        assert_eq!(joined.body, "Joined");
        assert_eq!(joined.kind, MessageKind::Joined);
        assert!(joined.is_notice());

        let left = Message::left(1, 2, "Alice");
        assert_eq!(left.body, "Left");
        assert_eq!(left.author, "Alice");
        assert!(left.is_notice());
    }

    #[test]
    fn test_text_keeps_empty_body() {
        let msg = Message::text(3, 7, "Bob", "");
        assert_eq!(msg.body, "");
        assert!(!msg.is_notice());
    }

    #[test]
    fn test_text_that_looks_like_a_notice() {
        // Only the kind marks a notice; a user may type "Joined".
        let msg = Message::text(0, 0, "Bob", JOINED_BODY);
        assert!(!msg.is_notice());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&MessageKind::Joined).unwrap();
        assert_eq!(json, "\"joined\"");
    }
}
