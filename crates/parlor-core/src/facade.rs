//! Command, query and subscription surface for presentation code.
//!
//! The facade is the only way to mutate a room. Each command applies one
//! transition to the owned [`RoomState`] and then notifies every listener
//! exactly once, synchronously, before returning.

use crate::message::Message;
use crate::palette::Palette;
use crate::snapshot::RoomSnapshot;
use crate::state::{Outcome, RoomPolicy, RoomState};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

/// Default capacity of the snapshot broadcast used by [`RoomFacade::watch`].
const DEFAULT_WATCH_CAPACITY: usize = 64;

/// Handle returned by [`RoomFacade::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A snapshot listener.
pub type Listener = Box<dyn FnMut(&RoomSnapshot) + Send>;

/// Room configuration.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Transition policy.
    pub policy: RoomPolicy,
    /// Participant colours.
    pub palette: Palette,
    /// Buffered snapshots per [`RoomFacade::watch`] receiver.
    pub watch_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            policy: RoomPolicy::default(),
            palette: Palette::default(),
            watch_capacity: DEFAULT_WATCH_CAPACITY,
        }
    }
}

/// Room statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStats {
    /// Roster entries.
    pub participant_count: usize,
    /// Timeline length.
    pub message_count: usize,
    /// Registered listeners.
    pub listener_count: usize,
    /// Live watch receivers.
    pub watcher_count: usize,
}

/// The read/write surface of a chat room.
pub struct RoomFacade {
    state: RoomState,
    palette: Arc<Palette>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    sender: broadcast::Sender<Arc<RoomSnapshot>>,
}

impl fmt::Debug for RoomFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomFacade")
            .field("state", &self.state)
            .field("palette", &self.palette)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for RoomFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomFacade {
    /// Create a room with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RoomConfig::default())
    }

    /// Create a room with custom configuration.
    #[must_use]
    pub fn with_config(config: RoomConfig) -> Self {
        Self::with_state(RoomState::with_policy(config.policy), config)
    }

    /// Wrap an existing state. `config.policy` is ignored in favour of the
    /// state's own policy.
    #[must_use]
    pub fn with_state(state: RoomState, config: RoomConfig) -> Self {
        info!("Creating room with config: {:?}", config);
        let (sender, _) = broadcast::channel(config.watch_capacity.max(1));
        Self {
            state,
            palette: Arc::new(config.palette),
            listeners: Vec::new(),
            next_subscription: 0,
            sender,
        }
    }

    /// Add a participant.
    pub fn add_user(&mut self, name: &str) -> Outcome {
        let outcome = self.state.join(name);
        self.notify("add_user", outcome);
        outcome
    }

    /// Remove a participant.
    pub fn remove_user(&mut self, name: &str) -> Outcome {
        let outcome = self.state.leave(name);
        self.notify("remove_user", outcome);
        outcome
    }

    /// Post a message.
    pub fn send_message(&mut self, author: &str, body: &str) -> Outcome {
        let outcome = self.state.post_message(author, body);
        self.notify("send_message", outcome);
        outcome
    }

    /// Set or clear a typing flag.
    pub fn update_typing(&mut self, name: &str, is_typing: bool) -> Outcome {
        let outcome = self.state.set_typing(name, is_typing);
        self.notify("update_typing", outcome);
        outcome
    }

    /// Participant names in join order.
    #[must_use]
    pub fn participants(&self) -> &[String] {
        self.state.participants()
    }

    /// The timeline, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    /// Whether `name` is flagged as typing.
    #[must_use]
    pub fn is_typing(&self, name: &str) -> bool {
        self.state.is_typing(name)
    }

    /// Colour for a current participant, or the palette fallback.
    #[must_use]
    pub fn color_for(&self, name: &str) -> &str {
        self.state
            .index_of(name)
            .map_or(self.palette.fallback(), |index| self.palette.at(index))
    }

    /// The palette in use.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The underlying state, read-only.
    #[must_use]
    pub fn state(&self) -> &RoomState {
        &self.state
    }

    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot::capture(&self.state, Arc::clone(&self.palette))
    }

    /// Register a listener called after every command.
    ///
    /// Listeners run in registration order.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&RoomSnapshot) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!(subscription = id.0, listeners = self.listeners.len(), "Listener subscribed");
        id
    }

    /// Remove a listener.
    ///
    /// Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        let removed = self.listeners.len() != before;
        if removed {
            debug!(subscription = id.0, "Listener unsubscribed");
        }
        removed
    }

    /// Receive one snapshot per command on another task.
    ///
    /// Slow receivers that fall more than the configured capacity behind
    /// observe [`broadcast::error::RecvError::Lagged`].
    #[must_use]
    pub fn watch(&self) -> broadcast::Receiver<Arc<RoomSnapshot>> {
        self.sender.subscribe()
    }

    pub(crate) fn watch_sender(&self) -> broadcast::Sender<Arc<RoomSnapshot>> {
        self.sender.clone()
    }

    /// Get room statistics.
    #[must_use]
    pub fn stats(&self) -> RoomStats {
        RoomStats {
            participant_count: self.state.participants().len(),
            message_count: self.state.messages().len(),
            listener_count: self.listeners.len(),
            watcher_count: self.sender.receiver_count(),
        }
    }

    fn notify(&mut self, command: &'static str, outcome: Outcome) {
        if self.listeners.is_empty() && self.sender.receiver_count() == 0 {
            return;
        }

        let snapshot = Arc::new(self.snapshot());
        for (_, listener) in &mut self.listeners {
            listener(snapshot.as_ref());
        }
        let watchers = self.sender.send(snapshot).unwrap_or_default();
        trace!(
            command,
            ?outcome,
            listeners = self.listeners.len(),
            watchers,
            "Snapshot published"
        );
    }
}
