//! # parlor-core
//!
//! In-memory state engine for a multi-participant chat room.
//!
//! This crate provides the building blocks:
//!
//! - **RoomState** - Participants, timeline and typing flags with total transitions
//! - **RoomFacade** - Commands, queries and snapshot subscriptions for presentation code
//! - **Palette** - Colours derived from a participant's position
//! - **Composer** - Input buffers that turn keystrokes into commands
//! - **RoomHandle** - Single-writer task for use from many threads
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Composer   │────▶│ RoomFacade  │────▶│  RoomState  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │  Listeners  │
//!                     └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use parlor_core::RoomFacade;
//!
//! let mut room = RoomFacade::new();
//! room.subscribe(|snapshot| println!("{} messages", snapshot.messages.len()));
//!
//! room.add_user("Alice");
//! room.add_user("Bob");
//! room.send_message("Alice", "hi");
//! room.remove_user("Alice");
//!
//! assert_eq!(room.participants(), ["Bob"]);
//! assert_eq!(room.color_for("Bob"), room.palette().at(0));
//! ```

pub mod clock;
pub mod composer;
pub mod facade;
pub mod handle;
pub mod message;
pub mod palette;
pub mod roster;
pub mod snapshot;
pub mod state;
pub mod typing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use composer::{ComposeTarget, Composer};
pub use facade::{Listener, RoomConfig, RoomFacade, RoomStats, SubscriptionId};
pub use handle::{spawn, RoomError, RoomHandle};
pub use message::{Message, MessageId, MessageKind};
pub use palette::{Palette, PaletteError};
pub use snapshot::RoomSnapshot;
pub use state::{AbsentLeave, DuplicateJoin, Outcome, RoomPolicy, RoomState};
pub use typing::TypingState;
