//! Messages as held in a message window.

use roomlink_proto::{UserId, WireDirectMessage, WireMessage};
use serde::Serialize;

use crate::view::ViewContext;

/// A message in a room or direct conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Server-assigned ID. `None` for local echoes not yet acknowledged.
    pub id: Option<u64>,
    /// Author's user ID.
    pub sender_id: UserId,
    /// Author's display name.
    pub sender_name: String,
    /// Message text.
    pub content: String,
    /// ISO-8601 creation time, as reported by the server.
    pub created_at: Option<String>,
    /// Room or direct conversation the message belongs to.
    pub context: ViewContext,
    /// Rendered locally on send, before server acknowledgment.
    pub is_local_echo: bool,
}

impl Message {
    /// Room message received from the server.
    pub fn from_room(wire: WireMessage, room: &str) -> Self {
        Self {
            id: wire.id,
            sender_id: wire.sender_id,
            sender_name: wire.sender_username,
            content: wire.content,
            created_at: wire.timestamp,
            context: ViewContext::Room(wire.room.unwrap_or_else(|| room.to_string())),
            is_local_echo: false,
        }
    }

    /// Direct message received from the server, seen from `local_id`'s side.
    pub fn from_direct(wire: WireDirectMessage, local_id: UserId) -> Self {
        let peer = if wire.sender_id == local_id { wire.recipient_id } else { wire.sender_id };

        Self {
            id: wire.id,
            sender_id: wire.sender_id,
            sender_name: wire.sender_username,
            content: wire.content,
            created_at: wire.timestamp,
            context: ViewContext::Direct(peer),
            is_local_echo: false,
        }
    }

    /// Message rendered immediately on send.
    pub fn local_echo(
        context: ViewContext,
        sender_id: UserId,
        sender_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            sender_id,
            sender_name: sender_name.into(),
            content: content.into(),
            created_at: None,
            context,
            is_local_echo: true,
        }
    }

    /// Local echo still waiting for its server-confirmed copy.
    pub fn is_pending_echo(&self) -> bool {
        self.is_local_echo && self.id.is_none()
    }

    /// Whether this server copy is the confirmation of `echo`.
    ///
    /// Echo timestamps come from the client clock and never match the
    /// server's, so only author and text are compared.
    pub fn confirms(&self, echo: &Message) -> bool {
        echo.is_pending_echo()
            && self.id.is_some()
            && self.sender_id == echo.sender_id
            && self.content == echo.content
    }
}
