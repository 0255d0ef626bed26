//! Arbitrary session operations for property and fuzz testing.
//!
//! Operations draw from deliberately small domains (three rooms, five users,
//! 64 message IDs) so that random sequences collide often: duplicate
//! deliveries, stale pages, confirmations for the wrong peer, and messages
//! for rooms that are no longer on screen.

use std::collections::BTreeMap;

use arbitrary::{Arbitrary, Unstructured};
use roomlink_client::{LocalUser, Session, SessionAction, SessionConfig, SessionEvent};
use roomlink_proto::{
    ConversationSummary, ServerEvent, WireDirectMessage, WireMessage,
    server::{
        Conversations, DirectHistory, DirectMessageSent, MarkReadConfirmed, MemberChange,
        MessageHistory, OlderMessages, RoomMembers,
    },
};

/// ID of the local user in generated sessions.
pub const LOCAL_USER_ID: u64 = 1;

/// Rooms generated operations refer to. The first is the default room.
pub const ROOMS: [&str; 3] = ["general_chat", "random", "dev"];

/// Fresh session for [`LOCAL_USER_ID`].
pub fn local_session() -> Session {
    Session::new(SessionConfig::new(LocalUser::new(LOCAL_USER_ID, "me")))
}

/// A user action or a server event.
#[derive(Debug, Clone, Arbitrary)]
pub enum SessionOp {
    /// User switches room.
    SwitchRoom {
        /// Room selector.
        room: u8,
    },
    /// User opens a direct conversation. May target the local user.
    StartDirectMessage {
        /// User selector.
        peer: u8,
    },
    /// User returns to rooms.
    ReturnToRooms,
    /// User sends a message.
    Send {
        /// Text selector.
        text: u8,
    },
    /// User scrolls to the top of the window.
    LoadOlder,
    /// Transport connected.
    Connect,
    /// Transport dropped.
    Disconnect,
    /// Server delivers a room message.
    RoomMessage {
        /// Room selector.
        room: u8,
        /// ID selector. `None` mimics servers that omit IDs.
        id: Option<u8>,
        /// User selector.
        sender: u8,
        /// Text selector.
        text: u8,
    },
    /// Server delivers the most recent history page.
    History {
        /// Room selector.
        room: u8,
        /// ID of the oldest message.
        first_id: u8,
        /// Number of messages.
        count: u8,
        /// Whether older messages exist.
        has_more: bool,
    },
    /// Server delivers an older page.
    OlderPage {
        /// Room selector.
        room: u8,
        /// ID of the oldest message.
        first_id: u8,
        /// Number of messages.
        count: u8,
        /// Whether even older messages exist.
        has_more: bool,
    },
    /// Server delivers a direct message.
    DirectMessage {
        /// User selector for the other party.
        peer: u8,
        /// Our own message echoed back rather than an incoming one.
        outgoing: bool,
        /// ID selector.
        id: Option<u8>,
        /// Text selector.
        text: u8,
    },
    /// Server delivers a direct conversation history.
    DirectHistory {
        /// User selector.
        peer: u8,
        /// ID of the oldest message.
        first_id: u8,
        /// Number of messages.
        count: u8,
    },
    /// Server acknowledges a direct message we sent.
    DirectSent {
        /// User selector.
        peer: u8,
        /// ID selector.
        id: u8,
    },
    /// Server delivers the conversation list.
    Conversations {
        /// (user selector, unread count) pairs.
        entries: Vec<(u8, u8)>,
    },
    /// Server confirms a mark-read request.
    MarkReadConfirmed {
        /// User selector.
        peer: u8,
        /// Whether the server applied it.
        success: bool,
    },
    /// Server delivers a roster snapshot.
    Roster {
        /// Room selector.
        room: u8,
        /// User selectors.
        members: Vec<u8>,
    },
    /// A user joined a room.
    MemberJoined {
        /// Room selector.
        room: u8,
        /// User selector.
        user: u8,
    },
    /// A user left a room.
    MemberLeft {
        /// Room selector.
        room: u8,
        /// User selector.
        user: u8,
    },
}

impl SessionOp {
    /// Decode an operation sequence from raw bytes.
    ///
    /// Never fails: undecodable input yields a shorter (possibly empty)
    /// sequence.
    pub fn sequence(data: &[u8]) -> Vec<Self> {
        let mut u = Unstructured::new(data);
        let mut ops = Vec::new();
        while !u.is_empty() && ops.len() < data.len() {
            match Self::arbitrary(&mut u) {
                Ok(op) => ops.push(op),
                Err(_) => break,
            }
        }
        ops
    }

    /// Apply this operation to `session`.
    ///
    /// Rejected user input produces no actions.
    pub fn apply(&self, session: &mut Session) -> Vec<SessionAction> {
        match self {
            Self::SwitchRoom { room } => session.switch_to_room(room_name(*room)),
            Self::StartDirectMessage { peer } => {
                let peer = user_id(*peer);
                session.start_direct_message(peer, format!("user{peer}")).unwrap_or_default()
            },
            Self::ReturnToRooms => session.return_to_rooms(),
            Self::Send { text } => session.send_message(&text_for(*text)).unwrap_or_default(),
            Self::LoadOlder => session.load_older(),
            Self::Connect => session.handle(SessionEvent::Connected),
            Self::Disconnect => session.handle(SessionEvent::Disconnected),
            other => match other.server_event() {
                Some(event) => session.handle(SessionEvent::Server(event)),
                None => Vec::new(),
            },
        }
    }

    /// The server event this operation delivers, if it is one.
    pub fn server_event(&self) -> Option<ServerEvent> {
        let event = match self {
            Self::SwitchRoom { .. }
            | Self::StartDirectMessage { .. }
            | Self::ReturnToRooms
            | Self::Send { .. }
            | Self::LoadOlder
            | Self::Connect
            | Self::Disconnect => return None,

            Self::RoomMessage { room, id, sender, text } => ServerEvent::NewMessage(WireMessage {
                id: id.map(message_id),
                sender_id: user_id(*sender),
                sender_username: format!("user{}", user_id(*sender)),
                content: text_for(*text),
                timestamp: None,
                room: Some(room_name(*room).to_string()),
                is_dm: false,
            }),
            Self::History { room, first_id, count, has_more } => {
                let room = room_name(*room);
                ServerEvent::MessageHistory(MessageHistory {
                    room: room.to_string(),
                    messages: room_page(room, *first_id, *count),
                    has_more: *has_more,
                })
            },
            Self::OlderPage { room, first_id, count, has_more } => {
                let room = room_name(*room);
                let messages = room_page(room, *first_id, *count);
                ServerEvent::OlderMessagesLoaded(OlderMessages {
                    room: room.to_string(),
                    offset: messages.len() as u64,
                    messages,
                    has_more: *has_more,
                })
            },
            Self::DirectMessage { peer, outgoing, id, text } => {
                let peer = user_id(*peer);
                let (sender_id, recipient_id) =
                    if *outgoing { (LOCAL_USER_ID, peer) } else { (peer, LOCAL_USER_ID) };
                ServerEvent::NewDirectMessage(WireDirectMessage {
                    id: id.map(message_id),
                    sender_id,
                    sender_username: format!("user{sender_id}"),
                    recipient_id,
                    content: text_for(*text),
                    timestamp: None,
                })
            },
            Self::DirectHistory { peer, first_id, count } => {
                let peer = user_id(*peer);
                let messages = (0..page_len(*count))
                    .map(|i| WireDirectMessage {
                        id: Some(message_id(first_id.wrapping_add(i))),
                        sender_id: if i % 2 == 0 { peer } else { LOCAL_USER_ID },
                        sender_username: String::new(),
                        recipient_id: if i % 2 == 0 { LOCAL_USER_ID } else { peer },
                        content: text_for(i),
                        timestamp: None,
                    })
                    .collect();
                ServerEvent::DirectMessageHistory(DirectHistory {
                    peer_id: peer,
                    peer_name: format!("user{peer}"),
                    messages,
                })
            },
            Self::DirectSent { peer, id } => ServerEvent::DirectMessageSent(DirectMessageSent {
                recipient_id: user_id(*peer),
                message_id: Some(message_id(*id)),
            }),
            Self::Conversations { entries } => {
                let by_peer: BTreeMap<u64, u32> = entries
                    .iter()
                    .map(|(peer, count)| (user_id(*peer), u32::from(*count)))
                    .collect();
                ServerEvent::Conversations(Conversations {
                    conversations: by_peer
                        .into_iter()
                        .filter(|(peer, _)| *peer != LOCAL_USER_ID)
                        .map(|(peer_id, unread_count)| ConversationSummary {
                            peer_id,
                            username: format!("user{peer_id}"),
                            unread_count,
                            last_message_time: None,
                        })
                        .collect(),
                })
            },
            Self::MarkReadConfirmed { peer, success } => {
                ServerEvent::MarkReadConfirmed(MarkReadConfirmed {
                    success: *success,
                    sender_id: user_id(*peer),
                })
            },
            Self::Roster { room, members } => ServerEvent::RoomMembers(RoomMembers {
                room: room_name(*room).to_string(),
                members: members
                    .iter()
                    .map(|u| (user_id(*u), format!("user{}", user_id(*u))))
                    .collect(),
            }),
            Self::MemberJoined { room, user } => ServerEvent::MemberJoined(member(*room, *user)),
            Self::MemberLeft { room, user } => ServerEvent::MemberLeft(member(*room, *user)),
        };
        Some(event)
    }
}

fn room_name(selector: u8) -> &'static str {
    ROOMS[usize::from(selector) % ROOMS.len()]
}

/// Users 1..=5; 1 is the local user.
fn user_id(selector: u8) -> u64 {
    u64::from(selector % 5) + 1
}

fn message_id(selector: u8) -> u64 {
    u64::from(selector % 64)
}

fn page_len(count: u8) -> u8 {
    count % 25
}

fn text_for(selector: u8) -> String {
    format!("message {}", selector % 4)
}

fn room_page(room: &str, first_id: u8, count: u8) -> Vec<WireMessage> {
    (0..page_len(count))
        .map(|i| WireMessage {
            id: Some(message_id(first_id.wrapping_add(i))),
            sender_id: user_id(i),
            sender_username: format!("user{}", user_id(i)),
            content: text_for(i),
            timestamp: None,
            room: Some(room.to_string()),
            is_dm: false,
        })
        .collect()
}

fn member(room: u8, user: u8) -> MemberChange {
    MemberChange {
        room: room_name(room).to_string(),
        user_id: user_id(user),
        username: format!("user{}", user_id(user)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_ops() {
        assert!(SessionOp::sequence(&[]).is_empty());
    }

    #[test]
    fn user_ops_are_not_server_events() {
        assert!(SessionOp::LoadOlder.server_event().is_none());
        assert!(SessionOp::Connect.server_event().is_none());
    }

    #[test]
    fn self_dm_is_rejected_without_actions() {
        let mut session = local_session();
        // Selector 0 maps to the local user.
        let actions = SessionOp::StartDirectMessage { peer: 0 }.apply(&mut session);

        assert!(actions.is_empty());
        assert_eq!(session.view().active_peer(), None);
    }
}
