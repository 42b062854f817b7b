//! Authoritative room state and its transitions.
//!
//! [`RoomState`] owns the roster, the timeline and the typing flags. Every
//! transition is total: it always leaves the state consistent and reports an
//! [`Outcome`] instead of failing. Mutation is only reachable through
//! [`RoomFacade`](crate::RoomFacade).

use crate::clock::{Clock, Millis, SystemClock};
use crate::message::{Message, MessageId};
use crate::roster::Roster;
use crate::typing::TypingState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// What to do when a name that is already present joins again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateJoin {
    /// Append a second roster entry and a second join notice.
    Allow,
    /// Leave the state untouched.
    #[default]
    Ignore,
}

/// What to do when a name that is not present leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentLeave {
    /// Append a leave notice anyway.
    #[default]
    Announce,
    /// Leave the state untouched.
    Ignore,
}

/// Resolution of the room's ambiguous transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomPolicy {
    /// Duplicate join handling.
    pub duplicate_join: DuplicateJoin,
    /// Leave-of-absentee handling.
    pub absent_leave: AbsentLeave,
    /// Drop a participant's typing flag when they leave.
    pub clear_typing_on_leave: bool,
}

impl RoomPolicy {
    /// Permissive behaviour: duplicates allowed, absent leaves announced and
    /// typing flags kept across leaves.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            duplicate_join: DuplicateJoin::Allow,
            absent_leave: AbsentLeave::Announce,
            clear_typing_on_leave: false,
        }
    }
}

/// Result of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The state changed.
    Applied,
    /// The policy turned the command into a no-op.
    Ignored,
}

/// In-memory chat room.
#[derive(Debug)]
pub struct RoomState {
    roster: Roster,
    messages: Vec<Message>,
    typing: TypingState,
    policy: RoomPolicy,
    clock: Arc<dyn Clock>,
    next_id: MessageId,
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomState {
    /// Create an empty room with the default policy and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RoomPolicy::default())
    }

    /// Create an empty room with a specific policy.
    #[must_use]
    pub fn with_policy(policy: RoomPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Create an empty room with a specific policy and time source.
    #[must_use]
    pub fn with_clock(policy: RoomPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            roster: Roster::new(),
            messages: Vec::new(),
            typing: TypingState::new(),
            policy,
            clock,
            next_id: 0,
        }
    }

    /// The policy this room was built with.
    #[must_use]
    pub fn policy(&self) -> RoomPolicy {
        self.policy
    }

    /// Add a participant and announce it.
    pub(crate) fn join(&mut self, name: &str) -> Outcome {
        if self.policy.duplicate_join == DuplicateJoin::Ignore && self.roster.is_present(name) {
            debug!(participant = %name, "Duplicate join ignored");
            return Outcome::Ignored;
        }

        self.roster.push(name);
        let (id, timestamp) = self.stamp();
        self.messages.push(Message::joined(id, timestamp, name));
        debug!(participant = %name, participants = self.roster.count(), "Joined");
        Outcome::Applied
    }

    /// Remove the first entry for a participant and announce it.
    pub(crate) fn leave(&mut self, name: &str) -> Outcome {
        let removed = self.roster.remove_first(name).is_some();
        if !removed && self.policy.absent_leave == AbsentLeave::Ignore {
            debug!(participant = %name, "Leave of absent participant ignored");
            return Outcome::Ignored;
        }

        if self.policy.clear_typing_on_leave {
            self.typing.clear(name);
        }

        let (id, timestamp) = self.stamp();
        self.messages.push(Message::left(id, timestamp, name));
        debug!(participant = %name, was_present = removed, "Left");
        Outcome::Applied
    }

    /// Append a text message. Empty bodies are kept.
    pub(crate) fn post_message(&mut self, author: &str, body: &str) -> Outcome {
        let (id, timestamp) = self.stamp();
        self.messages.push(Message::text(id, timestamp, author, body));
        debug!(author = %author, id, len = body.len(), "Message posted");
        Outcome::Applied
    }

    /// Upsert the typing flag for `name`.
    pub(crate) fn set_typing(&mut self, name: &str, is_typing: bool) -> Outcome {
        self.typing.set(name, is_typing);
        Outcome::Applied
    }

    /// Participant names in join order.
    #[must_use]
    pub fn participants(&self) -> &[String] {
        self.roster.names()
    }

    /// The timeline, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether `name` is flagged as typing.
    #[must_use]
    pub fn is_typing(&self, name: &str) -> bool {
        self.typing.is_typing(name)
    }

    /// Position of `name` in the roster.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.roster.index_of(name)
    }

    /// The typing flags.
    #[must_use]
    pub fn typing(&self) -> &TypingState {
        &self.typing
    }

    /// Allocate the next id and a timestamp no earlier than the last entry.
    fn stamp(&mut self) -> (MessageId, Millis) {
        let id = self.next_id;
        self.next_id += 1;
        let floor = self.messages.last().map_or(0, |m| m.timestamp);
        (id, self.clock.now_millis().max(floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::message::MessageKind;

    fn room(policy: RoomPolicy) -> (RoomState, ManualClock) {
        let clock = ManualClock::new(1_000);
        (RoomState::with_clock(policy, Arc::new(clock.clone())), clock)
    }

    fn bodies(state: &RoomState) -> Vec<(&str, &str)> {
        state
            .messages()
            .iter()
            .map(|m| (m.author.as_str(), m.body.as_str()))
            .collect()
    }

    #[test]
    fn test_join_appends_one_notice() {
        let (mut state, _) = room(RoomPolicy::default());

        assert_eq!(state.join("A"), Outcome::Applied);

        assert_eq!(state.participants(), ["A"]);
        assert_eq!(bodies(&state), [("A", "Joined")]);
        assert_eq!(state.messages()[0].kind, MessageKind::Joined);
    }

    #[test]
    fn test_leave_after_join() {
        let (mut state, _) = room(RoomPolicy::default());
        state.join("A");

        assert_eq!(state.leave("A"), Outcome::Applied);

        assert!(state.participants().is_empty());
        assert_eq!(bodies(&state), [("A", "Joined"), ("A", "Left")]);
    }

    #[test]
    fn test_absent_leave_announced_by_default() {
        let (mut state, _) = room(RoomPolicy::default());

        assert_eq!(state.leave("ghost"), Outcome::Applied);
        assert_eq!(bodies(&state), [("ghost", "Left")]);
    }

    #[test]
    fn test_absent_leave_ignored() {
        let (mut state, _) = room(RoomPolicy {
            absent_leave: AbsentLeave::Ignore,
            ..RoomPolicy::default()
        });

        assert_eq!(state.leave("ghost"), Outcome::Ignored);
        assert!(state.messages().is_empty());
    }

    #[test]
    fn test_duplicate_join_ignored_by_default() {
        let (mut state, _) = room(RoomPolicy::default());
        state.join("A");

        assert_eq!(state.join("A"), Outcome::Ignored);
        assert_eq!(state.participants(), ["A"]);
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_duplicate_join_allowed_in_legacy() {
        let (mut state, _) = room(RoomPolicy::legacy());
        state.join("A");
        state.join("A");

        assert_eq!(state.participants(), ["A", "A"]);
        assert_eq!(bodies(&state), [("A", "Joined"), ("A", "Joined")]);

        // Leave drops only the first entry.
        state.leave("A");
        assert_eq!(state.participants(), ["A"]);
    }

    #[test]
    fn test_post_keeps_empty_body_and_foreign_author() {
        let (mut state, _) = room(RoomPolicy::default());

        state.post_message("nobody", "");

        let msg = &state.messages()[0];
        assert_eq!(msg.author, "nobody");
        assert_eq!(msg.body, "");
        assert_eq!(msg.kind, MessageKind::Text);
    }

    #[test]
    fn test_typing_survives_leave_by_default() {
        let (mut state, _) = room(RoomPolicy::default());
        state.join("A");
        state.set_typing("A", true);
        state.leave("A");

        assert!(state.is_typing("A"));
    }

    #[test]
    fn test_typing_cleared_on_leave_when_configured() {
        let (mut state, _) = room(RoomPolicy {
            clear_typing_on_leave: true,
            ..RoomPolicy::default()
        });
        state.join("A");
        state.set_typing("A", true);
        state.leave("A");

        assert!(!state.is_typing("A"));
    }

    #[test]
    fn test_typing_without_participant() {
        let (mut state, _) = room(RoomPolicy::default());

        state.set_typing("stranger", true);
        assert!(state.is_typing("stranger"));
        assert!(!state.is_typing("never-set"));
        assert!(state.messages().is_empty());
    }

    #[test]
    fn test_ids_unique_within_same_tick() {
        let (mut state, _) = room(RoomPolicy::default());
        state.join("A");
        state.post_message("A", "one");
        state.post_message("A", "two");

        let ids: Vec<_> = state.messages().iter().map(|m| m.id).collect();
        let stamps: Vec<_> = state.messages().iter().map(|m| m.timestamp).collect();
        assert_eq!(ids, [0, 1, 2]);
        assert_eq!(stamps, [1_000, 1_000, 1_000]);
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let (mut state, clock) = room(RoomPolicy::default());
        state.join("A");
        clock.advance(50);
        state.post_message("A", "later");
        clock.set(10);
        state.post_message("A", "clock stepped back");
        clock.advance(5_000);
        state.leave("A");

        let stamps: Vec<_> = state.messages().iter().map(|m| m.timestamp).collect();
        assert_eq!(stamps, [1_000, 1_050, 1_050, 5_010]);
    }
}
