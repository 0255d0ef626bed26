//! What the user is looking at.
//!
//! [`ViewState`] is the single source of truth for whether a room or a direct
//! conversation is displayed. Every inbound event is checked against it
//! before it is allowed to touch the message window or the roster.

use roomlink_proto::{PeerId, RoomName};
use serde::Serialize;

/// Kind of conversation on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// A many-member room.
    Room,
    /// A two-party direct conversation.
    DirectMessage,
}

/// The conversation a piece of state belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ViewContext {
    /// A room, by name.
    Room(RoomName),
    /// A direct conversation, by peer ID.
    Direct(PeerId),
}

impl ViewContext {
    /// Room name, if this is a room context.
    pub fn room(&self) -> Option<&str> {
        match self {
            Self::Room(room) => Some(room),
            Self::Direct(_) => None,
        }
    }

    /// Peer ID, if this is a direct context.
    pub fn peer(&self) -> Option<PeerId> {
        match self {
            Self::Room(_) => None,
            Self::Direct(peer) => Some(*peer),
        }
    }
}

impl std::fmt::Display for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Room(room) => write!(f, "room {room}"),
            Self::Direct(peer) => write!(f, "dm {peer}"),
        }
    }
}

/// Effect of a view switch, used to decide which requests to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTransition {
    /// Context displayed before the switch.
    pub from: ViewContext,
    /// Context displayed after the switch.
    pub to: ViewContext,
    /// Room the server subscription should be dropped for, if the room
    /// subscription changed.
    pub left_room: Option<RoomName>,
}

impl ViewTransition {
    /// Whether the displayed context actually changed.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Currently displayed context.
///
/// The last room is remembered while a direct conversation is open so that
/// returning to rooms never lands on nothing; it is not considered active
/// until the mode switches back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    mode: ViewMode,
    room: RoomName,
    peer: Option<PeerId>,
}

impl ViewState {
    /// Start in room mode on the given room.
    pub fn new(default_room: impl Into<RoomName>) -> Self {
        Self { mode: ViewMode::Room, room: default_room.into(), peer: None }
    }

    /// Current mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Active room. `None` while a direct conversation is open.
    pub fn active_room(&self) -> Option<&str> {
        match self.mode {
            ViewMode::Room => Some(&self.room),
            ViewMode::DirectMessage => None,
        }
    }

    /// Active direct-conversation peer. `None` in room mode.
    pub fn active_peer(&self) -> Option<PeerId> {
        match self.mode {
            ViewMode::Room => None,
            ViewMode::DirectMessage => self.peer,
        }
    }

    /// Last room shown, active or not. Never empty.
    pub fn last_room(&self) -> &str {
        &self.room
    }

    /// Context currently displayed.
    pub fn context(&self) -> ViewContext {
        match (self.mode, self.peer) {
            (ViewMode::DirectMessage, Some(peer)) => ViewContext::Direct(peer),
            _ => ViewContext::Room(self.room.clone()),
        }
    }

    /// Whether `room` is on screen.
    pub fn is_viewing_room(&self, room: &str) -> bool {
        self.active_room() == Some(room)
    }

    /// Whether the conversation with `peer` is on screen.
    pub fn is_viewing_peer(&self, peer: PeerId) -> bool {
        self.active_peer() == Some(peer)
    }

    /// Show `room`, leaving direct-message mode if needed.
    pub fn switch_to_room(&mut self, room: impl Into<RoomName>) -> ViewTransition {
        let room = room.into();
        let from = self.context();
        let left_room = (self.room != room).then(|| std::mem::replace(&mut self.room, room));

        self.mode = ViewMode::Room;
        self.peer = None;

        ViewTransition { from, to: self.context(), left_room }
    }

    /// Show the conversation with `peer`. The room subscription is kept.
    pub fn start_direct_message(&mut self, peer: PeerId) -> ViewTransition {
        let from = self.context();

        self.mode = ViewMode::DirectMessage;
        self.peer = Some(peer);

        ViewTransition { from, to: self.context(), left_room: None }
    }

    /// Go back to the last room shown.
    pub fn return_to_rooms(&mut self) -> ViewTransition {
        let from = self.context();

        self.mode = ViewMode::Room;
        self.peer = None;

        ViewTransition { from, to: self.context(), left_room: None }
    }
}
