//! Text rendering of room snapshots.

use crate::config::RenderConfig;
use chrono::{DateTime, Local, Utc};
use parlor_core::{Message, RoomSnapshot};
use std::fmt::Write;

/// Shown in place of an empty timeline.
pub const EMPTY_TIMELINE: &str = "No messages yet...";

/// Marker appended to a name whose typing flag is set.
pub const TYPING_MARKER: &str = "Typing...";

/// Turns snapshots into printable text.
#[derive(Debug, Clone)]
pub struct Renderer {
    timestamps: bool,
    json: bool,
}

impl From<&RenderConfig> for Renderer {
    fn from(config: &RenderConfig) -> Self {
        Self {
            timestamps: config.timestamps,
            json: config.json,
        }
    }
}

impl Renderer {
    /// Render a snapshot.
    #[must_use]
    pub fn render(&self, snapshot: &RoomSnapshot) -> String {
        if self.json {
            return serde_json::to_string(snapshot)
                .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"));
        }

        let mut out = String::new();
        let _ = writeln!(out, "== participants ({})", snapshot.participants.len());
        for name in &snapshot.participants {
            let _ = write!(out, "  [{}] {}", snapshot.color_for(name), name);
            if snapshot.is_typing(name) {
                let _ = write!(out, " {TYPING_MARKER}");
            }
            out.push('\n');
        }

        out.push_str("== timeline\n");
        if snapshot.messages.is_empty() {
            let _ = writeln!(out, "  {EMPTY_TIMELINE}");
        }
        for message in &snapshot.messages {
            self.render_message(&mut out, snapshot, message);
        }
        out
    }

    fn render_message(&self, out: &mut String, snapshot: &RoomSnapshot, message: &Message) {
        let _ = write!(
            out,
            "  [{}] {}",
            snapshot.color_for(&message.author),
            message.author
        );
        if snapshot.is_typing(&message.author) {
            let _ = write!(out, " {TYPING_MARKER}");
        }
        if self.timestamps {
            let _ = write!(out, " on {}", format_timestamp(message.timestamp));
        }
        let _ = writeln!(out, ": {}", message.body);
    }
}

/// Format epoch milliseconds in local time.
#[must_use]
pub fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(
            || millis.to_string(),
            |utc| {
                utc.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            },
        )
}
