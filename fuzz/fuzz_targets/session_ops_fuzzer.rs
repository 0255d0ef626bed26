//! Fuzz target for the Session state machine
//!
//! Prevent view/window/unread desync under adversarial event orderings
//!
//! # Strategy
//!
//! - Stale responses: history and older pages for rooms no longer on screen
//! - Duplicates: the same message ID delivered live and in history
//! - Confirmations: mark-read acknowledgments for peers never requested
//! - Churn: connection drops in the middle of pagination
//!
//! # Invariants
//!
//! - Unread total equals the sum of per-peer counters
//! - Window context always matches the view on screen
//! - Message IDs in the window are unique
//! - Pagination only runs in room mode
//! - Roster belongs to the subscribed room

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomlink_harness::{InvariantRegistry, SessionOp, SessionSnapshot, local_session};

fuzz_target!(|data: &[u8]| {
    let invariants = InvariantRegistry::standard();
    let mut session = local_session();

    for op in SessionOp::sequence(data) {
        let _ = op.apply(&mut session);
        invariants.assert_all(&SessionSnapshot::from_session(&session), &format!("{op:?}"));
    }
});
