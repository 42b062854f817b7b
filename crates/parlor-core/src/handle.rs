//! Single-writer access to a room from many tasks.
//!
//! [`spawn`] moves a [`RoomFacade`] into a task that applies queued commands
//! strictly in arrival order. [`RoomHandle`] is the cloneable front end.

use crate::facade::RoomFacade;
use crate::snapshot::RoomSnapshot;
use crate::state::Outcome;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// Default command queue depth.
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Handle errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    /// The room task has stopped.
    #[error("Room task is no longer running")]
    Closed,
}

/// A command for the room task.
#[derive(Debug)]
enum RoomCommand {
    AddUser {
        name: String,
        reply: oneshot::Sender<Outcome>,
    },
    RemoveUser {
        name: String,
        reply: oneshot::Sender<Outcome>,
    },
    SendMessage {
        author: String,
        body: String,
        reply: oneshot::Sender<Outcome>,
    },
    UpdateTyping {
        name: String,
        is_typing: bool,
        reply: oneshot::Sender<Outcome>,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
}

/// Cloneable handle to a room owned by a background task.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    commands: mpsc::Sender<RoomCommand>,
    snapshots: broadcast::Sender<Arc<RoomSnapshot>>,
}

/// Move `facade` into a new task and return a handle to it.
///
/// The task stops once every handle has been dropped and returns the facade.
pub fn spawn(facade: RoomFacade) -> (RoomHandle, JoinHandle<RoomFacade>) {
    spawn_with_capacity(facade, DEFAULT_QUEUE_CAPACITY)
}

/// Like [`spawn`] with a specific command queue depth.
pub fn spawn_with_capacity(
    mut facade: RoomFacade,
    capacity: usize,
) -> (RoomHandle, JoinHandle<RoomFacade>) {
    let (commands, mut rx) = mpsc::channel(capacity.max(1));
    let handle = RoomHandle {
        commands,
        snapshots: facade.watch_sender(),
    };

    let task = tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            apply(&mut facade, command);
        }
        debug!("Room task stopped");
        facade
    });

    (handle, task)
}

fn apply(facade: &mut RoomFacade, command: RoomCommand) {
    // A caller that stopped waiting does not undo the command.
    match command {
        RoomCommand::AddUser { name, reply } => {
            let _ = reply.send(facade.add_user(&name));
        }
        RoomCommand::RemoveUser { name, reply } => {
            let _ = reply.send(facade.remove_user(&name));
        }
        RoomCommand::SendMessage {
            author,
            body,
            reply,
        } => {
            let _ = reply.send(facade.send_message(&author, &body));
        }
        RoomCommand::UpdateTyping {
            name,
            is_typing,
            reply,
        } => {
            let _ = reply.send(facade.update_typing(&name, is_typing));
        }
        RoomCommand::Snapshot { reply } => {
            let _ = reply.send(facade.snapshot());
        }
    }
}

impl RoomHandle {
    /// Add a participant.
    pub async fn add_user(&self, name: impl Into<String>) -> Result<Outcome, RoomError> {
        let name = name.into();
        self.request(|reply| RoomCommand::AddUser { name, reply })
            .await
    }

    /// Remove a participant.
    pub async fn remove_user(&self, name: impl Into<String>) -> Result<Outcome, RoomError> {
        let name = name.into();
        self.request(|reply| RoomCommand::RemoveUser { name, reply })
            .await
    }

    /// Post a message.
    pub async fn send_message(
        &self,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Outcome, RoomError> {
        let (author, body) = (author.into(), body.into());
        self.request(|reply| RoomCommand::SendMessage {
            author,
            body,
            reply,
        })
        .await
    }

    /// Set or clear a typing flag.
    pub async fn update_typing(
        &self,
        name: impl Into<String>,
        is_typing: bool,
    ) -> Result<Outcome, RoomError> {
        let name = name.into();
        self.request(|reply| RoomCommand::UpdateTyping {
            name,
            is_typing,
            reply,
        })
        .await
    }

    /// Capture the current state.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Receive one snapshot per applied command.
    #[must_use]
    pub fn watch(&self) -> broadcast::Receiver<Arc<RoomSnapshot>> {
        self.snapshots.subscribe()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| RoomError::Closed)?;
        rx.await.map_err(|_| RoomError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_applies_commands() {
        let (room, task) = spawn(RoomFacade::new());

        room.add_user("Alice").await.unwrap();
        room.send_message("Alice", "hi").await.unwrap();
        room.update_typing("Alice", true).await.unwrap();

        let snapshot = room.snapshot().await.unwrap();
        assert_eq!(snapshot.participants, ["Alice"]);
        assert_eq!(snapshot.messages.len(), 2);
        assert!(snapshot.is_typing("Alice"));

        drop(room);
        let facade = task.await.unwrap();
        assert_eq!(facade.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_handle_watch() {
        let (room, _task) = spawn(RoomFacade::new());
        let mut rx = room.watch();

        room.add_user("Bob").await.unwrap();

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.participants, ["Bob"]);
    }

    #[tokio::test]
    async fn test_concurrent_posts_keep_every_message() {
        let (room, _task) = spawn(RoomFacade::new());

        let mut tasks = Vec::new();
        for i in 0..8 {
            let room = room.clone();
            tasks.push(tokio::spawn(async move {
                for j in 0..10 {
                    room.send_message(format!("user-{i}"), format!("{j}"))
                        .await
                        .unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let snapshot = room.snapshot().await.unwrap();
        assert_eq!(snapshot.messages.len(), 80);
        let ids: Vec<_> = snapshot.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, (0..80).collect::<Vec<_>>());
        assert!(snapshot
            .messages
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_closed_room() {
        let (room, task) = spawn(RoomFacade::new());
        task.abort();
        let _ = task.await;

        assert_eq!(room.add_user("late").await, Err(RoomError::Closed));
    }
}
