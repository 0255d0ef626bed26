//! Frontend-agnostic user input.
//!
//! Frontends turn whatever the user did (a key press, a click, a line typed
//! at a prompt) into a [`UserCommand`]. Lines typed at a prompt go through
//! [`UserCommand::parse`]: text starting with `/` is a command, anything
//! else is a message for the conversation on screen.

use roomlink_proto::{PeerId, RoomName};
use thiserror::Error;

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Show a room.
    SwitchRoom {
        /// Room to show.
        room: RoomName,
    },
    /// Open a direct conversation.
    StartDirectMessage {
        /// The other party.
        peer_id: PeerId,
        /// Their display name, as found by user search.
        name: String,
    },
    /// Leave the direct conversation and show the last room.
    ReturnToRooms,
    /// Send a message to the conversation on screen.
    Send {
        /// Message text.
        text: String,
    },
    /// Create a room.
    CreateRoom {
        /// Requested name.
        name: String,
    },
    /// Load the page of history above what is on screen.
    LoadOlder,
    /// Refresh the conversation list.
    RefreshConversations,
    /// Refresh the room list.
    RefreshRooms,
    /// Exit.
    Quit,
}

/// A typed line that could not be turned into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing was typed.
    #[error("empty input")]
    Empty,

    /// Unknown command name.
    #[error("unknown command: /{command}")]
    Unknown {
        /// The command as typed, without the slash.
        command: String,
    },

    /// Command arguments are missing or malformed.
    #[error("usage: {usage}")]
    Usage {
        /// Correct usage of the command.
        usage: &'static str,
    },
}

impl UserCommand {
    /// Parse a line typed at the prompt.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let Some(command) = line.strip_prefix('/') else {
            return Ok(Self::Send { text: line.to_string() });
        };

        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let rest = parts.next().map(str::trim).unwrap_or_default();

        match name {
            "join" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage { usage: "/join <room>" });
                }
                Ok(Self::SwitchRoom { room: rest.to_string() })
            },
            "dm" => {
                let mut args = rest.splitn(2, char::is_whitespace);
                let peer_id = args.next().and_then(|id| id.parse::<PeerId>().ok());
                let name = args.next().map(str::trim).unwrap_or_default();
                match peer_id {
                    Some(peer_id) => Ok(Self::StartDirectMessage {
                        peer_id,
                        name: if name.is_empty() { format!("user {peer_id}") } else { name.into() },
                    }),
                    None => Err(CommandError::Usage { usage: "/dm <user_id> [name]" }),
                }
            },
            "rooms" | "back" => Ok(Self::ReturnToRooms),
            "create" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage { usage: "/create <room>" });
                }
                Ok(Self::CreateRoom { name: rest.to_string() })
            },
            "older" | "more" => Ok(Self::LoadOlder),
            "conversations" | "dms" => Ok(Self::RefreshConversations),
            "list" => Ok(Self::RefreshRooms),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown { command: other.to_string() }),
        }
    }
}
