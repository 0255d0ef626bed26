//! Relevance predicates for inbound events.
//!
//! The router holds no state. For every inbound event it reads the current
//! [`ViewState`] (and, for pagination, the [`MessageWindow`]) and decides
//! whether the event may touch view-scoped state. Events that fail a
//! predicate carry a [`Discard`] reason that the session logs.

use roomlink_proto::{PeerId, UserId, WireDirectMessage};

use crate::{
    view::{ViewContext, ViewState},
    window::MessageWindow,
};

/// Why an event was not applied to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Event is for a room other than the active one.
    WrongRoom,
    /// A direct conversation is on screen, so room state is frozen.
    DirectMode,
    /// Event is for a peer other than the one on screen.
    WrongPeer,
    /// Direct message neither sent nor received by the local user.
    NotRecipient,
    /// No older-page request is in flight for this context.
    NotLoading,
}

impl Discard {
    /// Short label used as a log field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WrongRoom => "wrong_room",
            Self::DirectMode => "direct_mode",
            Self::WrongPeer => "wrong_peer",
            Self::NotRecipient => "not_recipient",
            Self::NotLoading => "not_loading",
        }
    }
}

/// Where an inbound direct message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectRoute {
    /// The conversation is on screen: append it.
    Active {
        /// The other party.
        peer: PeerId,
    },
    /// Addressed to us but not on screen: count it as unread.
    Unread {
        /// The sender.
        peer: PeerId,
    },
}

/// Stateless dispatcher deciding which events apply to the current view.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventRouter;

impl EventRouter {
    /// Room messages, roster snapshots and joins/leaves apply only to the
    /// active room, and only in room mode.
    pub fn room_scoped(view: &ViewState, room: &str) -> Result<(), Discard> {
        match view.active_room() {
            None => Err(Discard::DirectMode),
            Some(active) if active == room => Ok(()),
            Some(_) => Err(Discard::WrongRoom),
        }
    }

    /// Route a direct message.
    ///
    /// A message addressed to us is appended if its sender's conversation
    /// is on screen and counted as unread otherwise, regardless of mode.
    /// Copies of our own messages are only appended, never counted.
    pub fn direct_message(
        view: &ViewState,
        local_id: UserId,
        message: &WireDirectMessage,
    ) -> Result<DirectRoute, Discard> {
        if message.recipient_id == local_id {
            let peer = message.sender_id;
            if view.is_viewing_peer(peer) {
                return Ok(DirectRoute::Active { peer });
            }
            return Ok(DirectRoute::Unread { peer });
        }

        if message.sender_id == local_id {
            let peer = message.recipient_id;
            if view.is_viewing_peer(peer) {
                return Ok(DirectRoute::Active { peer });
            }
            let reason =
                if view.active_peer().is_some() { Discard::WrongPeer } else { Discard::WrongRoom };
            return Err(reason);
        }

        Err(Discard::NotRecipient)
    }

    /// A direct history applies only while that peer is on screen.
    pub fn direct_history(view: &ViewState, peer: PeerId) -> Result<(), Discard> {
        match view.active_peer() {
            Some(active) if active == peer => Ok(()),
            Some(_) => Err(Discard::WrongPeer),
            None => Err(Discard::WrongRoom),
        }
    }

    /// An older page applies only to the window's own room, while the
    /// window is still on screen and waiting for it.
    pub fn older_page(
        view: &ViewState,
        window: &MessageWindow,
        room: &str,
    ) -> Result<(), Discard> {
        if window.context() != &ViewContext::Room(room.to_string()) {
            return Err(Discard::WrongRoom);
        }
        Self::room_scoped(view, room)?;
        if !window.is_loading_older() {
            return Err(Discard::NotLoading);
        }
        Ok(())
    }
}
