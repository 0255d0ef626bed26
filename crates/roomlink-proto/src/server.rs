//! Inbound events.
//!
//! The server's payloads are loosely shaped JSON objects. Each event name
//! gets a payload struct with its required fields; [`ServerEvent::from_envelope`]
//! rejects anything that does not fit, so the client state machine only ever
//! sees complete, typed events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Envelope,
    errors::{ProtocolError, Result},
    types::{ConversationSummary, PeerId, RoomName, UserId, WireDirectMessage, WireMessage},
};

/// Room list snapshot (`room_list`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomList {
    /// Every room known to the server.
    pub rooms: Vec<RoomName>,
}

/// Roster snapshot for a room (`current_users`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMembers {
    /// Room the roster belongs to.
    pub room: RoomName,
    /// Present users, keyed by ID.
    #[serde(rename = "users")]
    pub members: BTreeMap<UserId, String>,
}

/// Incremental roster change (`user_joined`, `user_left`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberChange {
    /// Room the change applies to.
    pub room: RoomName,
    /// User who joined or left.
    pub user_id: UserId,
    /// Display name of that user.
    #[serde(default)]
    pub username: String,
}

/// Outcome of a room creation request (`room_created`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreated {
    /// Whether the room was created.
    pub success: bool,
    /// Name of the created room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<RoomName>,
    /// Human-readable outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the creator should switch to the new room.
    #[serde(default)]
    pub auto_join: bool,
}

/// Most recent page of a room's history (`message_history`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHistory {
    /// Room the history belongs to.
    pub room: RoomName,
    /// Messages, oldest first.
    pub messages: Vec<WireMessage>,
    /// Whether older messages exist server-side.
    #[serde(default)]
    pub has_more: bool,
}

/// A page of older history (`more_messages_loaded`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OlderMessages {
    /// Room the page belongs to.
    pub room: RoomName,
    /// Messages, oldest first.
    pub messages: Vec<WireMessage>,
    /// Server's count of messages delivered so far, counted from the newest.
    #[serde(default)]
    pub offset: u64,
    /// Whether even older messages exist.
    #[serde(default)]
    pub has_more: bool,
}

/// Conversation list snapshot (`dm_conversations`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversations {
    /// One entry per peer the user has exchanged messages with.
    pub conversations: Vec<ConversationSummary>,
}

/// Full history of a direct conversation (`dm_history`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectHistory {
    /// The other party.
    #[serde(rename = "recipient_id")]
    pub peer_id: PeerId,
    /// The other party's display name.
    #[serde(rename = "recipient_name", default)]
    pub peer_name: String,
    /// Messages, oldest first.
    pub messages: Vec<WireDirectMessage>,
}

/// Server acknowledgment of a direct message we sent (`dm_sent`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessageSent {
    /// Addressee of the acknowledged message.
    pub recipient_id: PeerId,
    /// ID the server assigned to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<u64>,
}

/// Confirmation that a peer's messages were marked read (`messages_marked_read`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkReadConfirmed {
    /// Whether the server applied the change.
    #[serde(default)]
    pub success: bool,
    /// Peer whose messages were marked read.
    pub sender_id: PeerId,
}

/// Online status change of a user (`user_status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    /// User whose status changed.
    pub user_id: UserId,
    /// Whether the user is now connected.
    pub online: bool,
}

/// Error report attached to several failure events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Human-readable reason.
    #[serde(default)]
    pub error: String,
}

/// Events the server delivers to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// `room_list`
    RoomList(RoomList),
    /// `current_users`
    RoomMembers(RoomMembers),
    /// `user_joined`
    MemberJoined(MemberChange),
    /// `user_left`
    MemberLeft(MemberChange),
    /// `room_created`
    RoomCreated(RoomCreated),
    /// `new_message`; `room` is guaranteed present.
    NewMessage(WireMessage),
    /// `message_history`
    MessageHistory(MessageHistory),
    /// `more_messages_loaded`
    OlderMessagesLoaded(OlderMessages),
    /// `load_more_error`
    LoadOlderFailed(ErrorReport),
    /// `message_history_error`
    HistoryFailed(ErrorReport),
    /// `dm_conversations`
    Conversations(Conversations),
    /// `new_dm`
    NewDirectMessage(WireDirectMessage),
    /// `dm_history`
    DirectMessageHistory(DirectHistory),
    /// `dm_sent`
    DirectMessageSent(DirectMessageSent),
    /// `messages_marked_read`
    MarkReadConfirmed(MarkReadConfirmed),
    /// `dm_error`
    DirectMessageError(ErrorReport),
    /// `message_error`
    MessageError(ErrorReport),
    /// `room_join_error`
    RoomJoinError(ErrorReport),
    /// `user_status`
    UserStatus(UserStatus),
}

impl ServerEvent {
    /// Wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomList(_) => "room_list",
            Self::RoomMembers(_) => "current_users",
            Self::MemberJoined(_) => "user_joined",
            Self::MemberLeft(_) => "user_left",
            Self::RoomCreated(_) => "room_created",
            Self::NewMessage(_) => "new_message",
            Self::MessageHistory(_) => "message_history",
            Self::OlderMessagesLoaded(_) => "more_messages_loaded",
            Self::LoadOlderFailed(_) => "load_more_error",
            Self::HistoryFailed(_) => "message_history_error",
            Self::Conversations(_) => "dm_conversations",
            Self::NewDirectMessage(_) => "new_dm",
            Self::DirectMessageHistory(_) => "dm_history",
            Self::DirectMessageSent(_) => "dm_sent",
            Self::MarkReadConfirmed(_) => "messages_marked_read",
            Self::DirectMessageError(_) => "dm_error",
            Self::MessageError(_) => "message_error",
            Self::RoomJoinError(_) => "room_join_error",
            Self::UserStatus(_) => "user_status",
        }
    }

    /// Validate an envelope against the schema for its event name.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownEvent`] for names outside the protocol
    /// and [`ProtocolError::InvalidPayload`] when required fields are missing
    /// or mistyped.
    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        let Envelope { event, data } = envelope;

        let decoded = match event.as_str() {
            "room_list" => Self::RoomList(parse("room_list", data)?),
            "current_users" => Self::RoomMembers(parse("current_users", data)?),
            "user_joined" => Self::MemberJoined(parse("user_joined", data)?),
            "user_left" => Self::MemberLeft(parse("user_left", data)?),
            "room_created" => Self::RoomCreated(parse("room_created", data)?),
            "new_message" => {
                let message: WireMessage = parse("new_message", data)?;
                if message.room.is_none() {
                    return Err(ProtocolError::InvalidPayload {
                        event: "new_message",
                        reason: "missing field `room`".to_string(),
                    });
                }
                Self::NewMessage(message)
            },
            "message_history" => Self::MessageHistory(parse("message_history", data)?),
            "more_messages_loaded" => {
                Self::OlderMessagesLoaded(parse("more_messages_loaded", data)?)
            },
            "load_more_error" => Self::LoadOlderFailed(parse("load_more_error", data)?),
            "message_history_error" => Self::HistoryFailed(parse("message_history_error", data)?),
            "dm_conversations" => Self::Conversations(parse("dm_conversations", data)?),
            "new_dm" => Self::NewDirectMessage(parse("new_dm", data)?),
            "dm_history" => Self::DirectMessageHistory(parse("dm_history", data)?),
            "dm_sent" => Self::DirectMessageSent(parse("dm_sent", data)?),
            "messages_marked_read" => Self::MarkReadConfirmed(parse("messages_marked_read", data)?),
            "dm_error" => Self::DirectMessageError(parse("dm_error", data)?),
            "message_error" => Self::MessageError(parse("message_error", data)?),
            "room_join_error" => Self::RoomJoinError(parse("room_join_error", data)?),
            "user_status" => Self::UserStatus(parse("user_status", data)?),
            _ => return Err(ProtocolError::UnknownEvent { event }),
        };

        Ok(decoded)
    }

    /// Wire data object. Inverse of [`ServerEvent::from_envelope`].
    pub fn data(&self) -> Value {
        let encoded = match self {
            Self::RoomList(p) => serde_json::to_value(p),
            Self::RoomMembers(p) => serde_json::to_value(p),
            Self::MemberJoined(p) | Self::MemberLeft(p) => serde_json::to_value(p),
            Self::RoomCreated(p) => serde_json::to_value(p),
            Self::NewMessage(p) => serde_json::to_value(p),
            Self::MessageHistory(p) => serde_json::to_value(p),
            Self::OlderMessagesLoaded(p) => serde_json::to_value(p),
            Self::Conversations(p) => serde_json::to_value(p),
            Self::NewDirectMessage(p) => serde_json::to_value(p),
            Self::DirectMessageHistory(p) => serde_json::to_value(p),
            Self::DirectMessageSent(p) => serde_json::to_value(p),
            Self::MarkReadConfirmed(p) => serde_json::to_value(p),
            Self::UserStatus(p) => serde_json::to_value(p),
            Self::LoadOlderFailed(p)
            | Self::HistoryFailed(p)
            | Self::DirectMessageError(p)
            | Self::MessageError(p)
            | Self::RoomJoinError(p) => serde_json::to_value(p),
        };
        // Payload structs contain only strings, integers, and string-keyed or
        // integer-keyed maps, all of which serialize.
        encoded.unwrap_or(Value::Null)
    }

    /// Wrap into a transport envelope.
    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.name(), self.data())
    }
}

fn parse<T: DeserializeOwned>(event: &'static str, data: Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| ProtocolError::InvalidPayload { event, reason: e.to_string() })
}
