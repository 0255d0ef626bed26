//! Unread direct-message counters.
//!
//! [`UnreadTracker`] is the only place unread counts live. The total is
//! recomputed from the per-peer map by every mutator and is never adjusted
//! on its own, so it cannot drift from the map.

use std::collections::BTreeMap;

use roomlink_proto::{ConversationSummary, PeerId};

/// Per-peer unread counters plus their derived total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnreadTracker {
    per_peer: BTreeMap<PeerId, u32>,
    total: u64,
}

impl UnreadTracker {
    /// Tracker with no unread messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// One more unread message from `peer`. Returns the new count.
    pub fn increment_for(&mut self, peer: PeerId) -> u32 {
        let count = self.per_peer.entry(peer).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;
        self.recompute_total();
        count
    }

    /// Zero the counter for `peer`.
    ///
    /// Returns whether anything changed.
    pub fn clear_for(&mut self, peer: PeerId) -> bool {
        let changed = self.per_peer.remove(&peer).is_some_and(|count| count > 0);
        self.recompute_total();
        changed
    }

    /// Replace every counter with the server's authoritative view.
    pub fn recompute_from_snapshot(&mut self, conversations: &[ConversationSummary]) {
        self.per_peer = conversations
            .iter()
            .filter(|c| c.unread_count > 0)
            .map(|c| (c.peer_id, c.unread_count))
            .collect();
        self.recompute_total();
    }

    /// Unread count for `peer`.
    pub fn count(&self, peer: PeerId) -> u32 {
        self.per_peer.get(&peer).copied().unwrap_or(0)
    }

    /// Unread messages across all peers.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Non-zero counters, ordered by peer.
    pub fn counts(&self) -> impl Iterator<Item = (PeerId, u32)> + '_ {
        self.per_peer.iter().map(|(peer, count)| (*peer, *count))
    }

    fn recompute_total(&mut self) {
        self.total = self.per_peer.values().map(|c| u64::from(*c)).sum();
    }
}
