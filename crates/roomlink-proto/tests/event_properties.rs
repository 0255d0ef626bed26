//! Property-based tests for envelope and event decoding.
//!
//! Decoding sits on the transport boundary, so it must reject anything
//! malformed without panicking and must accept every event the server can
//! legitimately produce.

use proptest::prelude::*;
use roomlink_proto::{
    ConversationSummary, Envelope, ProtocolError, ServerEvent, WireDirectMessage, WireMessage,
    types::UserId,
};

fn wire_message(room: Option<String>) -> impl Strategy<Value = WireMessage> {
    (
        prop::option::of(any::<u64>()),
        any::<UserId>(),
        "[a-z]{1,12}",
        ".{0,64}",
        prop::option::of("2025-0[1-9]-1[0-9]T1[0-9]:00:00"),
    )
        .prop_map(move |(id, sender_id, sender_username, content, timestamp)| WireMessage {
            id,
            sender_id,
            sender_username,
            content,
            timestamp,
            room: room.clone(),
            is_dm: false,
        })
}

fn direct_message() -> impl Strategy<Value = WireDirectMessage> {
    (prop::option::of(any::<u64>()), any::<UserId>(), any::<UserId>(), ".{0,64}").prop_map(
        |(id, sender_id, recipient_id, content)| WireDirectMessage {
            id,
            sender_id,
            sender_username: format!("user{sender_id}"),
            recipient_id,
            content,
            timestamp: None,
        },
    )
}

fn server_event() -> impl Strategy<Value = ServerEvent> {
    prop_oneof![
        wire_message(Some("general_chat".into())).prop_map(ServerEvent::NewMessage),
        direct_message().prop_map(ServerEvent::NewDirectMessage),
        prop::collection::vec((any::<u64>(), "[a-z]{1,8}", 0u32..50), 0..8).prop_map(|entries| {
            ServerEvent::Conversations(roomlink_proto::server::Conversations {
                conversations: entries
                    .into_iter()
                    .map(|(peer_id, username, unread_count)| ConversationSummary {
                        peer_id,
                        username,
                        unread_count,
                        last_message_time: None,
                    })
                    .collect(),
            })
        }),
        prop::collection::btree_map(any::<u64>(), "[a-z]{1,8}", 0..8).prop_map(|members| {
            ServerEvent::RoomMembers(roomlink_proto::server::RoomMembers {
                room: "general_chat".into(),
                members,
            })
        }),
        (prop::collection::vec(wire_message(None), 0..5), any::<u64>(), any::<bool>()).prop_map(
            |(messages, offset, has_more)| {
                ServerEvent::OlderMessagesLoaded(roomlink_proto::server::OlderMessages {
                    room: "general_chat".into(),
                    messages,
                    offset,
                    has_more,
                })
            }
        ),
    ]
}

proptest! {
    #[test]
    fn prop_envelope_parse_never_panics(text in ".{0,256}") {
        let _ = Envelope::from_json(&text);
    }

    #[test]
    fn prop_event_decode_never_panics(name in "[a-z_]{1,24}", body in ".{0,128}") {
        let data = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        let _ = ServerEvent::from_envelope(Envelope::new(name, data));
    }

    #[test]
    fn prop_server_events_survive_the_wire(event in server_event()) {
        let text = event.to_envelope().to_json();
        let envelope = Envelope::from_json(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let decoded =
            ServerEvent::from_envelope(envelope).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded, event);
    }
}

#[test]
fn decodes_history_page_as_sent_by_server() {
    let text = r#"["more_messages_loaded", {
        "messages": [
            {"id": 11, "sender_id": 2, "sender_username": "bob", "content": "older",
             "timestamp": "2025-03-01T10:00:00", "is_dm": false, "room_id": 1}
        ],
        "has_more": true,
        "offset": 21,
        "room": "general_chat"
    }]"#;

    let envelope = Envelope::from_json(text).expect("valid envelope");
    let event = ServerEvent::from_envelope(envelope).expect("valid payload");

    let ServerEvent::OlderMessagesLoaded(page) = event else {
        panic!("expected older page, got {event:?}");
    };
    assert_eq!(page.room, "general_chat");
    assert_eq!(page.offset, 21);
    assert!(page.has_more);
    assert_eq!(page.messages[0].id, Some(11));
}

#[test]
fn missing_required_field_names_the_event() {
    let envelope = Envelope::from_json(r#"["new_dm", {"sender_id": 3, "content": "hi"}]"#)
        .expect("valid envelope");

    let err = ServerEvent::from_envelope(envelope).expect_err("recipient_id is required");
    assert_eq!(err.event(), Some("new_dm"));
    assert!(matches!(err, ProtocolError::InvalidPayload { .. }));
}
