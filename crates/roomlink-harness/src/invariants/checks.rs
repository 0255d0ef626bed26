//! Standard invariant checks.

use std::collections::BTreeSet;

use roomlink_client::{ViewContext, ViewMode};

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// The unread total equals the sum of the per-peer counters.
///
/// Zero counters are not stored, so a peer with nothing unread never shows
/// a badge.
pub struct UnreadTotalConsistent;

impl Invariant for UnreadTotalConsistent {
    fn name(&self) -> &'static str {
        "unread_total_consistent"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let sum: u64 = state.unread.values().map(|c| u64::from(*c)).sum();
        if sum != state.unread_total {
            return Err(Violation {
                invariant: self.name(),
                message: format!("total {} but counters sum to {sum}", state.unread_total),
            });
        }

        if let Some((peer, _)) = state.unread.iter().find(|(_, count)| **count == 0) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("zero counter stored for peer {peer}"),
            });
        }
        Ok(())
    }
}

/// Exactly one of active room and active peer is set, matching the mode.
pub struct ViewExclusive;

impl Invariant for ViewExclusive {
    fn name(&self) -> &'static str {
        "view_exclusive"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let consistent = match state.mode {
            ViewMode::Room => state.active_room.is_some() && state.active_peer.is_none(),
            ViewMode::DirectMessage => state.active_room.is_none() && state.active_peer.is_some(),
        };

        if consistent && !state.last_room.is_empty() {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.name(),
                message: format!(
                    "mode {:?} with room {:?}, peer {:?}, last room {:?}",
                    state.mode, state.active_room, state.active_peer, state.last_room
                ),
            })
        }
    }
}

/// The message window belongs to the context on screen.
pub struct WindowMatchesView;

impl Invariant for WindowMatchesView {
    fn name(&self) -> &'static str {
        "window_matches_view"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.window.context == state.view_context {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.name(),
                message: format!(
                    "window holds {} while {} is on screen",
                    state.window.context, state.view_context
                ),
            })
        }
    }
}

/// A server-assigned ID appears at most once in the window.
pub struct UniqueMessageIds;

impl Invariant for UniqueMessageIds {
    fn name(&self) -> &'static str {
        "unique_message_ids"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let mut seen = BTreeSet::new();
        for id in state.window.ids.iter().flatten() {
            if !seen.insert(*id) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("message {id} appears twice in {}", state.window.context),
                });
            }
        }
        Ok(())
    }
}

/// The pagination offset is exactly the number of messages held.
pub struct WindowOffsetMatchesLength;

impl Invariant for WindowOffsetMatchesLength {
    fn name(&self) -> &'static str {
        "window_offset_matches_length"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let len = state.window.ids.len() as u64;
        if state.window.offset == len {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.name(),
                message: format!("offset {} but window holds {len}", state.window.offset),
            })
        }
    }
}

/// Older pages are only requested for a loaded room window.
pub struct LoadingOnlyInRooms;

impl Invariant for LoadingOnlyInRooms {
    fn name(&self) -> &'static str {
        "loading_only_in_rooms"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let window = &state.window;
        if !window.loading_older {
            return Ok(());
        }

        let in_room = matches!(window.context, ViewContext::Room(_));
        if in_room && window.initial_loaded && window.has_more {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.name(),
                message: format!(
                    "loading older in {} (initial loaded: {}, has more: {})",
                    window.context, window.initial_loaded, window.has_more
                ),
            })
        }
    }
}

/// The roster is scoped to the last room shown.
pub struct RosterScoped;

impl Invariant for RosterScoped {
    fn name(&self) -> &'static str {
        "roster_scoped"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.roster_room == state.last_room {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.name(),
                message: format!(
                    "roster scoped to {} while last room is {}",
                    state.roster_room, state.last_room
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::invariants::{InvariantRegistry, WindowSnapshot};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            mode: ViewMode::Room,
            active_room: Some("general_chat".into()),
            active_peer: None,
            last_room: "general_chat".into(),
            view_context: ViewContext::Room("general_chat".into()),
            window: WindowSnapshot {
                context: ViewContext::Room("general_chat".into()),
                ids: vec![Some(1), Some(2), None],
                offset: 3,
                has_more: true,
                loading_older: false,
                initial_loaded: true,
            },
            unread: BTreeMap::from([(5, 2)]),
            unread_total: 2,
            roster_room: "general_chat".into(),
            roster: BTreeSet::from([1, 2]),
            pending_mark_read: BTreeSet::new(),
        }
    }

    #[test]
    fn consistent_snapshot_passes() {
        assert!(InvariantRegistry::standard().check_all(&snapshot()).is_ok());
    }

    #[test]
    fn drifted_total_is_caught() {
        let mut state = snapshot();
        state.unread_total = 3;
        assert!(UnreadTotalConsistent.check(&state).is_err());
    }

    #[test]
    fn duplicate_id_is_caught() {
        let mut state = snapshot();
        state.window.ids.push(Some(2));
        state.window.offset = 4;
        assert!(UniqueMessageIds.check(&state).is_err());
    }

    #[test]
    fn offset_ahead_of_window_is_caught() {
        let mut state = snapshot();
        state.window.offset += 5;
        assert!(WindowOffsetMatchesLength.check(&state).is_err());
    }

    #[test]
    fn both_contexts_active_is_caught() {
        let mut state = snapshot();
        state.active_peer = Some(4);
        assert!(ViewExclusive.check(&state).is_err());
    }

    #[test]
    fn stale_window_is_caught() {
        let mut state = snapshot();
        state.view_context = ViewContext::Room("random".into());
        assert!(WindowMatchesView.check(&state).is_err());
    }
}
