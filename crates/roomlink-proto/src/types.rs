//! Shared payload types.
//!
//! These mirror the message and conversation records the server serializes
//! inside history, live, and snapshot events.

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
pub type UserId = u64;

/// Identifier of the other party in a direct conversation.
pub type PeerId = u64;

/// Room names double as room identifiers on the wire.
pub type RoomName = String;

/// A room message as serialized by the server.
///
/// Appears in `new_message`, `message_history`, and `more_messages_loaded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Server-assigned message ID. Absent on some live broadcasts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Author's user ID.
    pub sender_id: UserId,

    /// Author's display name.
    pub sender_username: String,

    /// Message text.
    pub content: String,

    /// ISO-8601 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Room the message was posted in. History entries omit it because the
    /// enclosing event already names the room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomName>,

    /// Set by the server on direct messages that leak into room channels.
    #[serde(default)]
    pub is_dm: bool,
}

/// A direct message as serialized by the server.
///
/// Appears in `new_dm` and `dm_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDirectMessage {
    /// Server-assigned message ID, unique within the peer pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Author's user ID.
    pub sender_id: UserId,

    /// Author's display name.
    #[serde(default)]
    pub sender_username: String,

    /// Addressee's user ID.
    pub recipient_id: UserId,

    /// Message text.
    pub content: String,

    /// ISO-8601 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// One entry of the authoritative conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// The other party.
    #[serde(rename = "user_id")]
    pub peer_id: PeerId,

    /// The other party's display name.
    pub username: String,

    /// Messages from the peer not yet marked read.
    #[serde(default)]
    pub unread_count: u32,

    /// ISO-8601 time of the latest message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<String>,
}
