//! Scenario tests for the session controller.
//!
//! Each test drives a [`Session`] through a short, realistic history of user
//! actions and server events, then checks the resulting state and the exact
//! requests emitted. Every test ends with an oracle check of the invariants
//! that must hold after any history.

use std::collections::BTreeMap;

use roomlink_client::{
    LocalUser, NoticeLevel, RenderInstruction, Session, SessionAction, SessionConfig,
    SessionError, SessionEvent, ViewContext, ViewMode,
};
use roomlink_harness::{InvariantRegistry, SessionSnapshot};
use roomlink_proto::{
    ClientEvent, ConversationSummary, ServerEvent, WireDirectMessage, WireMessage,
    server::{
        Conversations, DirectHistory, DirectMessageSent, ErrorReport, MarkReadConfirmed,
        MemberChange, MessageHistory, OlderMessages, RoomCreated, RoomMembers, UserStatus,
    },
};

const ME: u64 = 1;

fn session() -> Session {
    let mut session = Session::new(SessionConfig::new(LocalUser::new(ME, "me")));
    let _ = session.handle(SessionEvent::Connected);
    session
}

fn server(session: &mut Session, event: ServerEvent) -> Vec<SessionAction> {
    session.handle(SessionEvent::Server(event))
}

fn emits(actions: &[SessionAction]) -> Vec<ClientEvent> {
    actions.iter().filter_map(SessionAction::as_emit).cloned().collect()
}

fn renders(actions: &[SessionAction]) -> Vec<RenderInstruction> {
    actions.iter().filter_map(SessionAction::as_render).cloned().collect()
}

fn room_message(room: &str, id: Option<u64>, sender_id: u64, content: &str) -> WireMessage {
    WireMessage {
        id,
        sender_id,
        sender_username: format!("user{sender_id}"),
        content: content.to_string(),
        timestamp: Some("2025-01-01T12:00:00".to_string()),
        room: Some(room.to_string()),
        is_dm: false,
    }
}

fn history(room: &str, ids: std::ops::Range<u64>, has_more: bool) -> ServerEvent {
    ServerEvent::MessageHistory(MessageHistory {
        room: room.to_string(),
        messages: ids.map(|id| room_message(room, Some(id), 2, &format!("m{id}"))).collect(),
        has_more,
    })
}

fn older(room: &str, ids: std::ops::Range<u64>, has_more: bool) -> ServerEvent {
    let messages: Vec<_> =
        ids.map(|id| room_message(room, Some(id), 2, &format!("m{id}"))).collect();
    ServerEvent::OlderMessagesLoaded(OlderMessages {
        room: room.to_string(),
        offset: messages.len() as u64,
        messages,
        has_more,
    })
}

fn dm(sender_id: u64, recipient_id: u64, id: Option<u64>, content: &str) -> ServerEvent {
    ServerEvent::NewDirectMessage(WireDirectMessage {
        id,
        sender_id,
        sender_username: format!("user{sender_id}"),
        recipient_id,
        content: content.to_string(),
        timestamp: None,
    })
}

fn conversations(entries: &[(u64, u32)]) -> ServerEvent {
    ServerEvent::Conversations(Conversations {
        conversations: entries
            .iter()
            .map(|(peer_id, unread_count)| ConversationSummary {
                peer_id: *peer_id,
                username: format!("user{peer_id}"),
                unread_count: *unread_count,
                last_message_time: None,
            })
            .collect(),
    })
}

fn mark_read_confirmed(peer: u64) -> ServerEvent {
    ServerEvent::MarkReadConfirmed(MarkReadConfirmed { success: true, sender_id: peer })
}

fn member_left(room: &str, user_id: u64) -> ServerEvent {
    ServerEvent::MemberLeft(MemberChange { room: room.into(), user_id, username: String::new() })
}

fn assert_invariants(session: &Session, context: &str) {
    InvariantRegistry::standard().assert_all(&SessionSnapshot::from_session(session), context);
}

#[test]
fn connect_subscribes_to_default_room() {
    let mut session = Session::new(SessionConfig::new(LocalUser::new(ME, "me")));
    let actions = session.handle(SessionEvent::Connected);

    assert_eq!(emits(&actions), vec![
        ClientEvent::GetRooms,
        ClientEvent::GetConversations,
        ClientEvent::JoinRoom { room: "general_chat".into() },
        ClientEvent::GetMessageHistory { room: "general_chat".into(), limit: 20 },
        ClientEvent::GetRoomMembers { room: "general_chat".into() },
    ]);
    assert!(session.is_connected());

    // Oracle
    assert_invariants(&session, "after connect");
}

#[test]
fn switching_rooms_resets_window_and_discards_stale_page() {
    let mut session = session();
    let _ = server(&mut session, history("general_chat", 20..40, true));
    let _ = session.load_older();
    assert!(session.window().is_loading_older());

    // A -> B
    let actions = session.switch_to_room("random");
    assert_eq!(emits(&actions), vec![
        ClientEvent::LeaveRoom { room: "general_chat".into() },
        ClientEvent::JoinRoom { room: "random".into() },
        ClientEvent::GetMessageHistory { room: "random".into(), limit: 20 },
    ]);
    assert!(session.window().messages().is_empty());
    assert_eq!(session.window().offset(), 0);
    assert!(session.window().has_more());
    assert!(!session.window().is_loading_older());

    // The page requested for A arrives while B is on screen.
    let stale = server(&mut session, older("general_chat", 0..20, false));
    assert!(stale.is_empty());
    assert!(session.window().messages().is_empty());

    // B -> A resets again.
    let _ = server(&mut session, history("random", 0..3, false));
    let _ = session.switch_to_room("general_chat");
    assert!(session.window().messages().is_empty());
    assert_eq!(session.window().offset(), 0);
    assert!(session.window().has_more());

    // Oracle
    assert_invariants(&session, "after A -> B -> A");
}

#[test]
fn switching_to_current_room_is_noop() {
    let mut session = session();
    assert!(session.switch_to_room("general_chat").is_empty());
}

#[test]
fn duplicate_delivery_yields_one_entry() {
    let mut session = session();
    let _ = server(&mut session, history("general_chat", 0..3, false));

    let delivery = ServerEvent::NewMessage(room_message("general_chat", Some(7), 2, "x"));
    let first = server(&mut session, delivery.clone());
    let second = server(&mut session, delivery);

    assert_eq!(renders(&first).len(), 1);
    assert!(second.is_empty());
    let sevens = session.window().messages().iter().filter(|m| m.id == Some(7)).count();
    assert_eq!(sevens, 1);

    // Oracle
    assert_invariants(&session, "after duplicate delivery");
}

#[test]
fn local_echo_is_replaced_not_duplicated() {
    let mut session = session();
    let _ = server(&mut session, history("general_chat", 0..2, false));

    let sent = session.send_message("  hello  ").unwrap();
    assert_eq!(emits(&sent), vec![ClientEvent::SendMessage {
        message: "hello".into(),
        room: "general_chat".into()
    }]);
    assert_eq!(session.window().messages().len(), 3);
    assert!(session.window().messages()[2].is_pending_echo());

    let confirmation = room_message("general_chat", Some(50), ME, "hello");
    let confirmed = server(&mut session, ServerEvent::NewMessage(confirmation));

    assert!(matches!(
        renders(&confirmed).as_slice(),
        [RenderInstruction::EchoConfirmed { index: 2, .. }]
    ));
    assert_eq!(session.window().messages().len(), 3);
    assert_eq!(session.window().messages()[2].id, Some(50));
    assert!(!session.window().messages()[2].is_local_echo);

    // Oracle
    assert_invariants(&session, "after echo confirmation");
}

#[test]
fn self_dm_fails_without_emission() {
    let mut session = session();
    let before = SessionSnapshot::from_session(&session);

    let result = session.start_direct_message(ME, "me");

    assert_eq!(result, Err(SessionError::SelfMessage { peer_id: ME }));
    assert_eq!(SessionSnapshot::from_session(&session), before);
}

#[test]
fn member_left_respects_room_scope() {
    let mut session = Session::new(
        SessionConfig::new(LocalUser::new(ME, "me")).with_default_room("general"),
    );
    let _ = session.handle(SessionEvent::Connected);
    let _ = server(
        &mut session,
        ServerEvent::RoomMembers(RoomMembers {
            room: "general".into(),
            members: BTreeMap::from([(1, "alice".to_string()), (2, "bob".to_string())]),
        }),
    );

    let _ = server(&mut session, member_left("general", 2));
    assert_eq!(session.roster().members(), &BTreeMap::from([(1, "alice".to_string())]));

    let ignored = server(&mut session, member_left("other", 1));
    assert!(ignored.is_empty());
    assert_eq!(session.roster().members(), &BTreeMap::from([(1, "alice".to_string())]));
    assert_eq!(session.roster().count(), 1);

    // Oracle
    assert_invariants(&session, "after member changes");
}

#[test]
fn roster_is_frozen_while_in_direct_mode() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();

    let joined = server(
        &mut session,
        ServerEvent::MemberJoined(MemberChange {
            room: "general_chat".into(),
            user_id: 9,
            username: "zed".into(),
        }),
    );

    assert!(joined.is_empty());
    assert!(!session.roster().contains(9));
}

#[test]
fn unread_from_snapshot_then_increment() {
    let mut session = session();
    let _ = server(&mut session, conversations(&[(5, 3)]));

    let actions = server(&mut session, dm(5, ME, Some(100), "ping"));

    assert_eq!(session.unread().count(5), 4);
    assert_eq!(session.unread().total(), 4);
    let rendered = renders(&actions);
    assert!(rendered.contains(&RenderInstruction::UnreadBadge { peer_id: 5, count: 4 }));
    assert!(rendered.contains(&RenderInstruction::UnreadTotal { total: 4 }));
    assert!(rendered.iter().any(|r| matches!(r, RenderInstruction::Toast { peer_id: 5, .. })));
    // Known peer: no refresh needed.
    assert!(emits(&actions).is_empty());

    // Oracle
    assert_invariants(&session, "after unread increment");
}

#[test]
fn dm_from_unknown_peer_requests_snapshot() {
    let mut session = session();
    let _ = server(&mut session, conversations(&[(5, 0)]));

    let actions = server(&mut session, dm(8, ME, Some(1), "hi"));

    assert_eq!(session.unread().count(8), 1);
    assert_eq!(emits(&actions), vec![ClientEvent::GetConversations]);

    // The authoritative snapshot supersedes the local guess.
    let _ = server(&mut session, conversations(&[(5, 0), (8, 2)]));
    assert_eq!(session.unread().count(8), 2);
    assert_eq!(session.unread().total(), 2);
}

#[test]
fn opening_dm_clears_unread_only_on_confirmation() {
    let mut session = session();
    let _ = server(&mut session, conversations(&[(5, 3)]));

    let actions = session.start_direct_message(5, "user5").unwrap();
    assert_eq!(emits(&actions), vec![
        ClientEvent::StartDirectMessage { recipient_id: 5 },
        ClientEvent::MarkRead { sender_id: 5 },
    ]);
    assert_eq!(session.unread().count(5), 3);
    assert!(session.pending_mark_read().contains(&5));

    let confirmed = server(&mut session, mark_read_confirmed(5));
    assert_eq!(session.unread().count(5), 0);
    assert_eq!(session.unread().total(), 0);
    assert!(renders(&confirmed).contains(&RenderInstruction::UnreadBadge { peer_id: 5, count: 0 }));

    // Oracle
    assert_invariants(&session, "after mark-read confirmation");
}

#[test]
fn duplicate_confirmation_is_applied_once() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();
    let _ = server(&mut session, mark_read_confirmed(5));

    // Back in rooms, a new message from 5 arrives and is unread.
    let _ = session.return_to_rooms();
    let _ = server(&mut session, dm(5, ME, Some(2), "again"));
    assert_eq!(session.unread().count(5), 1);

    // A replayed confirmation must not clear it.
    let replay = server(&mut session, mark_read_confirmed(5));
    assert!(replay.is_empty());
    assert_eq!(session.unread().count(5), 1);
    assert_eq!(session.unread().total(), 1);
}

#[test]
fn dm_on_screen_is_appended_and_marked_read() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();
    let _ = server(
        &mut session,
        ServerEvent::DirectMessageHistory(DirectHistory {
            peer_id: 5,
            peer_name: "Eve".into(),
            messages: Vec::new(),
        }),
    );
    assert_eq!(session.peer_name(), Some("Eve"));

    let actions = server(&mut session, dm(5, ME, Some(3), "hi"));

    assert_eq!(session.window().messages().len(), 1);
    assert_eq!(session.unread().total(), 0);
    assert_eq!(emits(&actions), vec![ClientEvent::MarkRead { sender_id: 5 }]);

    // Someone else writes meanwhile: unread, window untouched.
    let _ = server(&mut session, dm(6, ME, Some(4), "psst"));
    assert_eq!(session.window().messages().len(), 1);
    assert_eq!(session.unread().count(6), 1);

    // Oracle
    assert_invariants(&session, "after dm routing");
}

#[test]
fn dm_echo_confirmed_by_acknowledgment() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();

    let sent = session.send_message("hey").unwrap();
    assert_eq!(emits(&sent), vec![ClientEvent::SendDirectMessage {
        recipient_id: 5,
        message: "hey".into()
    }]);

    let ack = server(
        &mut session,
        ServerEvent::DirectMessageSent(DirectMessageSent { recipient_id: 5, message_id: Some(77) }),
    );

    assert!(matches!(
        renders(&ack).as_slice(),
        [RenderInstruction::EchoConfirmed { index: 0, .. }]
    ));
    assert_eq!(session.window().messages()[0].id, Some(77));
}

#[test]
fn dm_history_for_other_peer_is_discarded() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();
    let _ = session.start_direct_message(6, "user6").unwrap();

    let stale = server(
        &mut session,
        ServerEvent::DirectMessageHistory(DirectHistory {
            peer_id: 5,
            peer_name: "user5".into(),
            messages: Vec::new(),
        }),
    );

    assert!(stale.is_empty());
    assert!(!session.window().is_initial_loaded());
    assert_eq!(session.window().context(), &ViewContext::Direct(6));
}

#[test]
fn rapid_load_older_emits_one_request() {
    let mut session = session();
    let _ = server(&mut session, history("general_chat", 20..40, true));

    let first = session.load_older();
    let second = session.load_older();

    assert_eq!(emits(&first), vec![ClientEvent::LoadOlderMessages {
        room: "general_chat".into(),
        offset: 20,
        limit: 20
    }]);
    assert!(second.is_empty());

    // Completion prepends and anchors on the previous oldest message.
    let done = server(&mut session, older("general_chat", 0..20, false));
    assert!(matches!(
        renders(&done).first(),
        Some(RenderInstruction::OlderPrepended { anchor: Some(20), has_more: false, .. })
    ));
    assert_eq!(session.window().offset(), 40);
    assert_eq!(session.window().messages().len(), 40);
    assert!(session.load_older().is_empty());

    // Oracle
    assert_invariants(&session, "after pagination");
}

#[test]
fn load_older_failure_allows_retry() {
    let mut session = session();
    let _ = server(&mut session, history("general_chat", 20..40, true));
    let _ = session.load_older();

    let failed = server(
        &mut session,
        ServerEvent::LoadOlderFailed(ErrorReport { error: "room not found".into() }),
    );

    assert!(renders(&failed).contains(&RenderInstruction::LoadingOlder { active: false }));
    assert!(!session.window().is_loading_older());
    assert_eq!(emits(&session.load_older()).len(), 1);
}

#[test]
fn room_name_validation() {
    let mut session = session();

    assert_eq!(session.create_room("   "), Err(SessionError::EmptyRoomName));
    assert_eq!(session.create_room(" a "), Err(SessionError::RoomNameTooShort { len: 1, min: 2 }));
    assert_eq!(
        session.create_room(&"x".repeat(21)),
        Err(SessionError::RoomNameTooLong { len: 21, max: 20 })
    );

    let ok = session.create_room("  lounge ").unwrap();
    assert_eq!(emits(&ok), vec![ClientEvent::CreateRoom { room_name: "lounge".into() }]);
}

#[test]
fn message_validation() {
    let mut session = session();

    assert_eq!(session.send_message(" \n "), Err(SessionError::EmptyMessage));
    assert_eq!(
        session.send_message(&"y".repeat(1001)),
        Err(SessionError::MessageTooLong { len: 1001, max: 1000 })
    );
    assert!(session.window().messages().is_empty());
}

#[test]
fn created_room_with_auto_join_is_opened() {
    let mut session = session();

    let actions = server(
        &mut session,
        ServerEvent::RoomCreated(RoomCreated {
            success: true,
            room_name: Some("lounge".into()),
            message: None,
            auto_join: true,
        }),
    );

    assert_eq!(session.view().active_room(), Some("lounge"));
    assert!(emits(&actions).contains(&ClientEvent::JoinRoom { room: "lounge".into() }));
}

#[test]
fn failed_room_creation_is_an_error_notice() {
    let mut session = session();

    let actions = server(
        &mut session,
        ServerEvent::RoomCreated(RoomCreated {
            success: false,
            room_name: None,
            message: Some("name taken".into()),
            auto_join: false,
        }),
    );

    assert!(matches!(
        renders(&actions).as_slice(),
        [RenderInstruction::Notice(notice)] if notice.level == NoticeLevel::Error
    ));
    assert_eq!(session.view().active_room(), Some("general_chat"));
}

#[test]
fn join_error_falls_back_to_default_room() {
    let mut session = session();
    let _ = session.switch_to_room("ghost");

    let report = ErrorReport { error: "no such room".into() };
    let actions = server(&mut session, ServerEvent::RoomJoinError(report));

    assert_eq!(session.view().active_room(), Some("general_chat"));
    assert!(emits(&actions).contains(&ClientEvent::JoinRoom { room: "general_chat".into() }));
}

#[test]
fn reconnect_in_direct_mode_resubscribes() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();

    let _ = session.handle(SessionEvent::Disconnected);
    assert!(session.pending_mark_read().is_empty());
    assert!(!session.is_connected());

    let actions = session.handle(SessionEvent::Connected);

    assert_eq!(emits(&actions), vec![
        ClientEvent::GetRooms,
        ClientEvent::GetConversations,
        ClientEvent::JoinRoom { room: "general_chat".into() },
        ClientEvent::StartDirectMessage { recipient_id: 5 },
        ClientEvent::MarkRead { sender_id: 5 },
    ]);
    assert_eq!(session.view().mode(), ViewMode::DirectMessage);

    // Oracle
    assert_invariants(&session, "after reconnect in direct mode");
}

#[test]
fn disconnect_abandons_pagination() {
    let mut session = session();
    let _ = server(&mut session, history("general_chat", 20..40, true));
    let _ = session.load_older();

    let actions = session.handle(SessionEvent::Disconnected);

    assert!(renders(&actions).contains(&RenderInstruction::LoadingOlder { active: false }));
    assert!(!session.window().is_loading_older());

    // The page that never came back cannot land after the reconnect reset.
    let _ = session.handle(SessionEvent::Connected);
    assert!(server(&mut session, older("general_chat", 0..20, true)).is_empty());
}

#[test]
fn return_to_rooms_restores_last_room() {
    let mut session = session();
    let _ = session.switch_to_room("random");
    let _ = session.start_direct_message(4, "user4").unwrap();

    let actions = session.return_to_rooms();

    assert_eq!(session.view().active_room(), Some("random"));
    assert_eq!(emits(&actions), vec![
        ClientEvent::GetMessageHistory { room: "random".into(), limit: 20 },
        ClientEvent::GetRoomMembers { room: "random".into() },
    ]);
    assert!(session.return_to_rooms().is_empty());
}

#[test]
fn peer_status_is_forwarded_in_any_mode() {
    let mut session = session();
    let _ = session.start_direct_message(4, "user4").unwrap();

    let actions = server(&mut session, ServerEvent::UserStatus(UserStatus {
        user_id: 9,
        online: true,
    }));

    assert_eq!(renders(&actions), vec![RenderInstruction::PeerStatus { user_id: 9, online: true }]);
    assert!(emits(&actions).is_empty());

    // Oracle
    assert_invariants(&session, "after user_status");
}

fn window_contents(session: &Session) -> Vec<&str> {
    session.window().messages().iter().map(|m| m.content.as_str()).collect()
}

fn dm_sent(recipient_id: u64, message_id: u64) -> ServerEvent {
    ServerEvent::DirectMessageSent(DirectMessageSent { recipient_id, message_id: Some(message_id) })
}

#[test]
fn own_copy_then_ack_keeps_every_echo() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();
    let _ = session.send_message("a").unwrap();
    let _ = session.send_message("b").unwrap();

    let copy = server(&mut session, dm(ME, 5, Some(10), "a"));
    let ack = server(&mut session, dm_sent(5, 10));

    assert!(matches!(
        renders(&copy).as_slice(),
        [RenderInstruction::EchoConfirmed { index: 0, .. }]
    ));
    assert!(renders(&ack).is_empty());
    assert_eq!(window_contents(&session), vec!["a", "b"]);
    assert!(session.window().messages()[1].is_pending_echo());

    // Oracle
    assert_invariants(&session, "after own copy then ack");
}

#[test]
fn ack_then_own_copy_keeps_every_echo() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();
    let _ = session.send_message("a").unwrap();
    let _ = session.send_message("b").unwrap();

    let _ = server(&mut session, dm_sent(5, 10));
    let copy = server(&mut session, dm(ME, 5, Some(10), "a"));

    assert!(renders(&copy).is_empty());
    assert_eq!(window_contents(&session), vec!["a", "b"]);
    assert_eq!(session.window().messages()[0].id, Some(10));
    assert!(session.window().messages()[1].is_pending_echo());

    // Oracle
    assert_invariants(&session, "after ack then own copy");
}

#[test]
fn overlapping_older_page_keeps_offset_at_window_length() {
    let mut session = session();
    let _ = server(&mut session, history("general_chat", 20..40, true));
    let _ = session.load_older();

    let _ = server(&mut session, older("general_chat", 10..25, true));

    assert_eq!(session.window().messages().len(), 30);
    assert_eq!(session.window().offset(), 30);
    assert_eq!(emits(&session.load_older()), vec![ClientEvent::LoadOlderMessages {
        room: "general_chat".into(),
        offset: 30,
        limit: 20,
    }]);

    // Oracle
    assert_invariants(&session, "after overlapping page");
}

#[test]
fn echo_sent_before_direct_history_survives_it() {
    let mut session = session();
    let _ = session.start_direct_message(5, "user5").unwrap();
    let _ = session.send_message("x").unwrap();

    let _ = server(
        &mut session,
        ServerEvent::DirectMessageHistory(DirectHistory {
            peer_id: 5,
            peer_name: "user5".into(),
            messages: Vec::new(),
        }),
    );

    assert_eq!(window_contents(&session), vec!["x"]);
    assert!(session.window().messages()[0].is_pending_echo());
    assert_eq!(session.window().offset(), 1);

    // Oracle
    assert_invariants(&session, "after dm_history");
}

#[test]
fn echo_sent_before_room_history_survives_it() {
    let mut session = session();
    let _ = session.switch_to_room("random");
    let _ = session.send_message("early").unwrap();

    let _ = server(&mut session, history("random", 0..3, false));

    assert_eq!(window_contents(&session), vec!["m0", "m1", "m2", "early"]);
    assert_eq!(session.window().offset(), 4);

    // Oracle
    assert_invariants(&session, "after message_history");
}

#[test]
fn late_mark_read_confirmation_refreshes_conversations() {
    let mut session = session();
    let _ = server(&mut session, conversations(&[(5, 2)]));
    let _ = session.start_direct_message(5, "user5").unwrap();
    let _ = session.return_to_rooms();
    let _ = server(&mut session, dm(5, ME, Some(30), "still there?"));
    assert_eq!(session.unread().count(5), 3);

    let actions = server(&mut session, mark_read_confirmed(5));

    assert_eq!(session.unread().total(), 0);
    assert_eq!(emits(&actions), vec![ClientEvent::GetConversations]);

    // A confirmation nothing crossed does not refresh.
    let _ = session.start_direct_message(5, "user5").unwrap();
    assert!(emits(&server(&mut session, mark_read_confirmed(5))).is_empty());

    // Oracle
    assert_invariants(&session, "after late confirmation");
}
