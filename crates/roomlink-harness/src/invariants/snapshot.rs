//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a session at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use std::collections::{BTreeMap, BTreeSet};

use roomlink_client::{Session, ViewContext, ViewMode};

/// Snapshot of a session's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// View mode.
    pub mode: ViewMode,
    /// Active room, if in room mode.
    pub active_room: Option<String>,
    /// Active direct-conversation peer, if in direct mode.
    pub active_peer: Option<u64>,
    /// Last room shown.
    pub last_room: String,
    /// Context on screen.
    pub view_context: ViewContext,
    /// Message window state.
    pub window: WindowSnapshot,
    /// Non-zero unread counters.
    pub unread: BTreeMap<u64, u32>,
    /// Reported unread total.
    pub unread_total: u64,
    /// Room the roster is scoped to.
    pub roster_room: String,
    /// Users in the roster.
    pub roster: BTreeSet<u64>,
    /// Peers with an outstanding mark-read request.
    pub pending_mark_read: BTreeSet<u64>,
}

/// Snapshot of a message window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Context the window belongs to.
    pub context: ViewContext,
    /// Message IDs, oldest first. `None` for pending local echoes.
    pub ids: Vec<Option<u64>>,
    /// Pagination offset.
    pub offset: u64,
    /// Whether older messages exist.
    pub has_more: bool,
    /// Whether an older-page request is in flight.
    pub loading_older: bool,
    /// Whether the initial history arrived.
    pub initial_loaded: bool,
}

impl SessionSnapshot {
    /// Capture the observable state of `session`.
    pub fn from_session(session: &Session) -> Self {
        let view = session.view();
        let window = session.window();

        Self {
            mode: view.mode(),
            active_room: view.active_room().map(str::to_string),
            active_peer: view.active_peer(),
            last_room: view.last_room().to_string(),
            view_context: view.context(),
            window: WindowSnapshot {
                context: window.context().clone(),
                ids: window.messages().iter().map(|m| m.id).collect(),
                offset: window.offset(),
                has_more: window.has_more(),
                loading_older: window.is_loading_older(),
                initial_loaded: window.is_initial_loaded(),
            },
            unread: session.unread().counts().collect(),
            unread_total: session.unread().total(),
            roster_room: session.roster().room().to_string(),
            roster: session.roster().members().keys().copied().collect(),
            pending_mark_read: session.pending_mark_read().clone(),
        }
    }
}
