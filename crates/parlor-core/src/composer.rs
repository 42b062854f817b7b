//! Text input buffers that drive the facade.
//!
//! A [`Composer`] models one input box: it holds the text being written,
//! reports typing activity while a message is being drafted, and resets
//! itself after submission.

use crate::facade::RoomFacade;
use crate::state::Outcome;

/// What a composer submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeTarget {
    /// The buffer is the name of a participant to add.
    ParticipantName,
    /// The buffer is a message body from `author`.
    Message {
        /// Message author.
        author: String,
    },
}

/// An input buffer bound to a room command.
#[derive(Debug, Clone)]
pub struct Composer {
    target: ComposeTarget,
    buffer: String,
}

impl Composer {
    /// A composer that adds participants.
    #[must_use]
    pub fn participant_name() -> Self {
        Self {
            target: ComposeTarget::ParticipantName,
            buffer: String::new(),
        }
    }

    /// A composer that posts messages on behalf of `author`.
    #[must_use]
    pub fn message(author: impl Into<String>) -> Self {
        Self {
            target: ComposeTarget::Message {
                author: author.into(),
            },
            buffer: String::new(),
        }
    }

    /// The current buffer contents.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// What this composer submits.
    #[must_use]
    pub fn target(&self) -> &ComposeTarget {
        &self.target
    }

    /// Replace the buffer contents.
    ///
    /// Message composers flag their author as typing while the buffer is
    /// non-empty.
    pub fn edit(&mut self, room: &mut RoomFacade, text: impl Into<String>) {
        self.buffer = text.into();
        if let ComposeTarget::Message { author } = &self.target {
            room.update_typing(author, !self.buffer.is_empty());
        }
    }

    /// Submit the buffer and clear it.
    ///
    /// Empty buffers are submitted as-is.
    pub fn submit(&mut self, room: &mut RoomFacade) -> Outcome {
        let text = std::mem::take(&mut self.buffer);
        match &self.target {
            ComposeTarget::ParticipantName => room.add_user(&text),
            ComposeTarget::Message { author } => {
                let outcome = room.send_message(author, &text);
                room.update_typing(author, false);
                outcome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_participant_composer_adds_user() {
        let mut room = RoomFacade::new();
        let mut input = Composer::participant_name();

        input.edit(&mut room, "Alice");
        assert!(room.messages().is_empty());
        assert!(!room.is_typing("Alice"));

        input.submit(&mut room);
        assert_eq!(room.participants(), ["Alice"]);
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_message_composer_tracks_typing() {
        let mut room = RoomFacade::new();
        room.add_user("Bob");
        let mut input = Composer::message("Bob");

        input.edit(&mut room, "h");
        assert!(room.is_typing("Bob"));

        input.edit(&mut room, "");
        assert!(!room.is_typing("Bob"));

        input.edit(&mut room, "hello");
        input.submit(&mut room);

        assert!(!room.is_typing("Bob"));
        assert_eq!(input.text(), "");
        let last = room.messages().last().unwrap();
        assert_eq!(last.body, "hello");
        assert_eq!(last.kind, MessageKind::Text);
    }

    #[test]
    fn test_submit_sends_then_clears_typing() {
        let mut room = RoomFacade::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        room.subscribe(move |s| {
            sink.lock()
                .unwrap()
                .push((s.messages.len(), s.is_typing("Bob")));
        });

        let mut input = Composer::message("Bob");
        input.edit(&mut room, "yo");
        input.submit(&mut room);

        assert_eq!(*events.lock().unwrap(), [(0, true), (1, true), (1, false)]);
    }

    #[test]
    fn test_empty_submit_is_recorded() {
        let mut room = RoomFacade::new();
        let mut input = Composer::message("Bob");

        input.submit(&mut room);
        assert_eq!(room.messages()[0].body, "");
    }
}
