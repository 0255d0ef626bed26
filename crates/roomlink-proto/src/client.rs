//! Outbound events.

use serde_json::{Value, json};

use crate::{
    Envelope,
    types::{PeerId, RoomName, UserId},
};

/// Requests the client emits to the server.
///
/// Every variant maps to exactly one wire event name; the mapping is fixed
/// by [`ClientEvent::name`] and must stay stable for server compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Subscribe to a room's broadcasts and presence.
    JoinRoom {
        /// Room to join.
        room: RoomName,
    },

    /// Unsubscribe from a room.
    LeaveRoom {
        /// Room to leave.
        room: RoomName,
    },

    /// Post a message to a room.
    SendMessage {
        /// Message text.
        message: String,
        /// Target room.
        room: RoomName,
    },

    /// Create a new room.
    CreateRoom {
        /// Name for the new room.
        room_name: RoomName,
    },

    /// Request the room list snapshot.
    GetRooms,

    /// Request the roster snapshot of a room.
    GetRoomMembers {
        /// Room whose roster is requested.
        room: RoomName,
    },

    /// Open a direct conversation and fetch its history.
    StartDirectMessage {
        /// The other party.
        recipient_id: PeerId,
    },

    /// Send a direct message.
    SendDirectMessage {
        /// The other party.
        recipient_id: PeerId,
        /// Message text.
        message: String,
    },

    /// Mark every message from a peer as read.
    MarkRead {
        /// Peer whose messages were read.
        sender_id: UserId,
    },

    /// Request the conversation list snapshot.
    GetConversations,

    /// Request the most recent page of a room's history.
    GetMessageHistory {
        /// Room whose history is requested.
        room: RoomName,
        /// Page size.
        limit: u32,
    },

    /// Request the page of history preceding what the client holds.
    LoadOlderMessages {
        /// Room whose history is paginated.
        room: RoomName,
        /// Messages already loaded, counted from the newest.
        offset: u64,
        /// Page size.
        limit: u32,
    },
}

impl ClientEvent {
    /// Wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom { .. } => "leave_room",
            Self::SendMessage { .. } => "send_message",
            Self::CreateRoom { .. } => "create_room",
            Self::GetRooms => "get_rooms",
            Self::GetRoomMembers { .. } => "get_current_users",
            Self::StartDirectMessage { .. } => "start_dm",
            Self::SendDirectMessage { .. } => "send_dm",
            Self::MarkRead { .. } => "mark_messages_as_read",
            Self::GetConversations => "get_dm_conversations",
            Self::GetMessageHistory { .. } => "get_message_history",
            Self::LoadOlderMessages { .. } => "load_more_messages",
        }
    }

    /// Wire data object.
    pub fn data(&self) -> Value {
        match self {
            Self::JoinRoom { room } | Self::LeaveRoom { room } | Self::GetRoomMembers { room } => {
                json!({ "room": room })
            },
            Self::SendMessage { message, room } => json!({ "message": message, "room": room }),
            Self::CreateRoom { room_name } => json!({ "room_name": room_name }),
            Self::GetRooms | Self::GetConversations => json!({}),
            Self::StartDirectMessage { recipient_id } => json!({ "recipient_id": recipient_id }),
            Self::SendDirectMessage { recipient_id, message } => {
                json!({ "recipient_id": recipient_id, "message": message })
            },
            Self::MarkRead { sender_id } => json!({ "sender_id": sender_id }),
            Self::GetMessageHistory { room, limit } => json!({ "room": room, "limit": limit }),
            Self::LoadOlderMessages { room, offset, limit } => {
                json!({ "room": room, "offset": offset, "limit": limit })
            },
        }
    }

    /// Wrap into a transport envelope.
    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.name(), self.data())
    }
}
