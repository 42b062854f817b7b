//! Line commands and their dispatch onto a room.
//!
//! The shell plays the participant-input role: it owns one [`Composer`] per
//! author for drafts and one for new participant names.

use crate::metrics;
use parlor_core::{Composer, RoomFacade};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  join <name>             add a participant
  leave <name>            remove a participant
  say <name> <text>       post a message immediately
  draft <name> <text>     type into <name>'s input box (empty text clears it)
  send <name>             submit <name>'s input box
  typing <name> on|off    set a typing flag directly
  show                    print the room
  help                    print this text
  quit                    exit";

/// Input parse errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Unrecognized verb.
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    /// A required argument is missing.
    #[error("Missing argument for `{command}`: {argument}")]
    MissingArgument {
        /// Command verb.
        command: &'static str,
        /// Argument name.
        argument: &'static str,
    },

    /// Typing flag was neither `on` nor `off`.
    #[error("Expected `on` or `off`, got: {0}")]
    InvalidFlag(String),
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a participant.
    Join(String),
    /// Remove a participant.
    Leave(String),
    /// Post a message.
    Say {
        /// Author.
        author: String,
        /// Body, possibly empty.
        body: String,
    },
    /// Replace an author's draft.
    Draft {
        /// Author.
        author: String,
        /// New draft text.
        text: String,
    },
    /// Submit an author's draft.
    Send(String),
    /// Set a typing flag.
    Typing {
        /// Participant name.
        name: String,
        /// New flag.
        on: bool,
    },
    /// Print the room.
    Show,
    /// Print usage.
    Help,
    /// Exit.
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown verbs and missing or malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = split_word(line);
        let command = match verb {
            "join" => Self::Join(required(rest, "join", "name")?),
            "leave" => Self::Leave(required(rest, "leave", "name")?),
            "say" => {
                let (author, body) = split_word(rest);
                Self::Say {
                    author: required(author, "say", "name")?,
                    body: body.to_string(),
                }
            }
            "draft" => {
                let (author, text) = split_word(rest);
                Self::Draft {
                    author: required(author, "draft", "name")?,
                    text: text.to_string(),
                }
            }
            "send" => Self::Send(required(rest, "send", "name")?),
            "typing" => {
                let (name, flag) = split_word(rest);
                let name = required(name, "typing", "name")?;
                let on = match flag {
                    "on" => true,
                    "off" => false,
                    "" => {
                        return Err(ParseError::MissingArgument {
                            command: "typing",
                            argument: "on|off",
                        })
                    }
                    other => return Err(ParseError::InvalidFlag(other.to_string())),
                };
                Self::Typing { name, on }
            }
            "show" => Self::Show,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

fn required(
    value: &str,
    command: &'static str,
    argument: &'static str,
) -> Result<String, ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ParseError::MissingArgument { command, argument });
    }
    Ok(value.to_string())
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to print; listeners have already rendered.
    Done,
    /// Print this text.
    Print(String),
    /// Stop reading input.
    Quit,
}

/// Applies commands to a room it owns.
pub struct Shell {
    room: RoomFacade,
    names: Composer,
    drafts: HashMap<String, Composer>,
    render: Box<dyn Fn(&RoomFacade) -> String>,
}

impl Shell {
    /// Wrap a room. `render` formats the room for `show`.
    pub fn new(room: RoomFacade, render: impl Fn(&RoomFacade) -> String + 'static) -> Self {
        Self {
            room,
            names: Composer::participant_name(),
            drafts: HashMap::new(),
            render: Box::new(render),
        }
    }

    /// The room being driven.
    #[must_use]
    pub fn room(&self) -> &RoomFacade {
        &self.room
    }

    /// Apply one command.
    pub fn execute(&mut self, command: Command) -> Reply {
        debug!(?command, "Executing");
        match command {
            Command::Join(name) => {
                self.names.edit(&mut self.room, name);
                self.names.submit(&mut self.room);
                metrics::record_command("add_user");
            }
            Command::Leave(name) => {
                self.room.remove_user(&name);
                self.drafts.remove(&name);
                metrics::record_command("remove_user");
            }
            Command::Say { author, body } => {
                self.room.send_message(&author, &body);
                metrics::record_command("send_message");
            }
            Command::Draft { author, text } => {
                self.drafts
                    .entry(author)
                    .or_insert_with_key(|author| Composer::message(author.clone()))
                    .edit(&mut self.room, text);
                metrics::record_command("update_typing");
            }
            Command::Send(author) => {
                let composer = self
                    .drafts
                    .entry(author)
                    .or_insert_with_key(|author| Composer::message(author.clone()));
                composer.submit(&mut self.room);
                metrics::record_command("send_message");
            }
            Command::Typing { name, on } => {
                self.room.update_typing(&name, on);
                metrics::record_command("update_typing");
            }
            Command::Show => return Reply::Print((self.render)(&self.room)),
            Command::Help => return Reply::Print(HELP.to_string()),
            Command::Quit => return Reply::Quit,
        }
        metrics::set_room_gauges(&self.room.stats());
        Reply::Done
    }
}
