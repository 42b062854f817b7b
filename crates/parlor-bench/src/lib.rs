//! Shared fixtures for the Parlor benchmarks.

use parlor_core::RoomFacade;

/// Build a room with `participants` members and `messages` text messages
/// spread across them.
#[must_use]
pub fn populated_room(participants: usize, messages: usize) -> RoomFacade {
    let mut room = RoomFacade::new();
    for i in 0..participants {
        room.add_user(&format!("user-{i}"));
    }
    for i in 0..messages {
        let author = format!("user-{}", i % participants.max(1));
        room.send_message(&author, "benchmark payload");
    }
    room
}
