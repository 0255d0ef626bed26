//! Property-based tests for the session state machine.
//!
//! Random histories of user actions and server events are decoded from raw
//! bytes with [`SessionOp::sequence`]. Every standard invariant must hold
//! after every step, and a handful of targeted properties must hold from any
//! reachable state.

use proptest::prelude::*;
use roomlink_client::{Session, SessionAction, SessionEvent, UnreadTracker, ViewContext};
use roomlink_harness::{
    InvariantRegistry, LOCAL_USER_ID, ROOMS, SessionOp, SessionSnapshot, local_session,
};
use roomlink_proto::{ClientEvent, ConversationSummary, ServerEvent, server::MarkReadConfirmed};

/// Raw bytes long enough to decode a few dozen operations.
fn history() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Replay `bytes` on a fresh connected session.
fn reach(bytes: &[u8]) -> Session {
    let mut session = local_session();
    let _ = session.handle(SessionEvent::Connected);
    for op in SessionOp::sequence(bytes) {
        let _ = op.apply(&mut session);
    }
    session
}

#[derive(Debug, Clone)]
enum UnreadOp {
    Increment(u64),
    Clear(u64),
    Snapshot(Vec<(u64, u32)>),
}

fn unread_op() -> impl Strategy<Value = UnreadOp> {
    prop_oneof![
        4 => (1..6u64).prop_map(UnreadOp::Increment),
        2 => (1..6u64).prop_map(UnreadOp::Clear),
        1 => prop::collection::vec((1..6u64, 0..10u32), 0..5).prop_map(UnreadOp::Snapshot),
    ]
}

proptest! {
    /// Session invariants hold under arbitrary histories, connected or not.
    #[test]
    fn prop_session_invariants_hold(bytes in history()) {
        let invariants = InvariantRegistry::standard();
        let mut session = local_session();

        prop_assert!(invariants.check_all(&SessionSnapshot::from_session(&session)).is_ok());

        for op in SessionOp::sequence(&bytes) {
            let _ = op.apply(&mut session);
            let snapshot = SessionSnapshot::from_session(&session);
            prop_assert!(
                invariants.check_all(&snapshot).is_ok(),
                "Invariant violated after {:?}: {:?}",
                op,
                invariants.check_all(&snapshot)
            );
        }
    }

    /// Delivering the same identified message twice changes nothing the
    /// second time.
    #[test]
    fn prop_duplicate_delivery_is_idempotent(
        bytes in history(),
        room in any::<u8>(),
        id in any::<u8>(),
        sender in any::<u8>(),
        text in any::<u8>(),
    ) {
        let mut session = reach(&bytes);
        let op = SessionOp::RoomMessage { room, id: Some(id), sender, text };

        let _ = op.apply(&mut session);
        let before = SessionSnapshot::from_session(&session);
        let second = op.apply(&mut session);

        prop_assert!(second.is_empty(), "second delivery produced {:?}", second);
        prop_assert_eq!(SessionSnapshot::from_session(&session), before);
    }

    /// At most one older-page request is ever in flight.
    #[test]
    fn prop_load_older_is_single_flight(bytes in history()) {
        let mut session = reach(&bytes);

        let _ = session.load_older();
        let again = session.load_older();

        let requests = again
            .iter()
            .filter(|a| matches!(a.as_emit(), Some(ClientEvent::LoadOlderMessages { .. })))
            .count();
        prop_assert_eq!(requests, 0);
    }

    /// A mark-read confirmation nobody asked for never clears a counter.
    #[test]
    fn prop_unmatched_mark_read_is_ignored(bytes in history(), peer in 2..6u64) {
        let mut session = reach(&bytes);
        prop_assume!(!session.pending_mark_read().contains(&peer));

        let before = SessionSnapshot::from_session(&session);
        let actions = session.handle(SessionEvent::Server(ServerEvent::MarkReadConfirmed(
            MarkReadConfirmed { success: true, sender_id: peer },
        )));

        prop_assert!(actions.is_empty());
        prop_assert_eq!(SessionSnapshot::from_session(&session), before);
    }

    /// Switching to a different room always starts from an empty window.
    #[test]
    fn prop_room_switch_resets_window(bytes in history(), target in 0..ROOMS.len()) {
        let mut session = reach(&bytes);
        let room = ROOMS[target];
        prop_assume!(session.view().active_room() != Some(room));

        let actions = session.switch_to_room(room);

        let window = session.window();
        prop_assert_eq!(window.context(), &ViewContext::Room(room.to_string()));
        prop_assert!(window.messages().is_empty());
        prop_assert_eq!(window.offset(), 0);
        prop_assert!(window.has_more());
        prop_assert!(!window.is_loading_older());
        prop_assert!(session.roster().members().is_empty());
        let history_requested = actions.iter().any(|a| {
            matches!(
                a.as_emit(),
                Some(ClientEvent::GetMessageHistory { room: r, .. }) if r == room
            )
        });
        prop_assert!(history_requested);
    }

    /// The local user can never become the direct-message peer.
    #[test]
    fn prop_self_dm_never_opens(bytes in history()) {
        let mut session = reach(&bytes);
        let before = SessionSnapshot::from_session(&session);

        prop_assert!(session.start_direct_message(LOCAL_USER_ID, "me").is_err());
        prop_assert_eq!(SessionSnapshot::from_session(&session), before);
        prop_assert_ne!(session.view().active_peer(), Some(LOCAL_USER_ID));
    }

    /// Dropping the connection emits no requests and abandons pending work.
    #[test]
    fn prop_disconnect_emits_nothing(bytes in history()) {
        let mut session = reach(&bytes);

        let actions = session.handle(SessionEvent::Disconnected);

        prop_assert!(actions.iter().all(|a| matches!(a, SessionAction::Render(_))));
        prop_assert!(session.pending_mark_read().is_empty());
        prop_assert!(!session.window().is_loading_older());
    }

    /// The unread total always equals the sum of the per-peer counters.
    #[test]
    fn prop_unread_total_is_sum(ops in prop::collection::vec(unread_op(), 0..64)) {
        let mut tracker = UnreadTracker::new();

        for op in ops {
            match &op {
                UnreadOp::Increment(peer) => {
                    let _ = tracker.increment_for(*peer);
                },
                UnreadOp::Clear(peer) => {
                    let _ = tracker.clear_for(*peer);
                },
                UnreadOp::Snapshot(entries) => {
                    let summaries: Vec<_> = entries
                        .iter()
                        .map(|(peer_id, unread_count)| ConversationSummary {
                            peer_id: *peer_id,
                            username: String::new(),
                            unread_count: *unread_count,
                            last_message_time: None,
                        })
                        .collect();
                    tracker.recompute_from_snapshot(&summaries);
                },
            }

            let sum: u64 = tracker.counts().map(|(_, count)| u64::from(count)).sum();
            prop_assert_eq!(tracker.total(), sum, "total drifted after {:?}", op);
            prop_assert!(tracker.counts().all(|(_, count)| count > 0));
        }
    }
}
