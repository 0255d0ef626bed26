//! Declarative instructions for the renderer.
//!
//! The session never inspects rendered output. Everything the renderer needs
//! is carried in these instructions, and every decision the session makes
//! is based on its own state alone.

use std::collections::BTreeMap;

use roomlink_proto::{ConversationSummary, PeerId, RoomName, UserId};
use serde::Serialize;

use crate::{message::Message, view::ViewContext};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Rejected user input.
    Warning,
    /// Server-reported failure.
    Error,
}

/// Inline message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text to show.
    pub text: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    /// Server-reported failure.
    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

/// A state change the renderer should project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "render", rename_all = "snake_case")]
pub enum RenderInstruction {
    /// A different conversation is on screen; clear the message pane.
    ViewChanged {
        /// Context now displayed.
        context: ViewContext,
        /// Display name of the DM peer, when known.
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    /// The message pane was replaced by a history load.
    WindowReplaced {
        /// Context of the window.
        context: ViewContext,
        /// Messages, oldest first.
        messages: Vec<Message>,
        /// Whether older messages can be loaded.
        has_more: bool,
    },

    /// Show a new message at the bottom of `context`.
    MessageAppended {
        /// Context the message belongs to.
        context: ViewContext,
        /// The message.
        message: Message,
        /// Scroll to the bottom if the user is already there, else show a
        /// new-message indicator.
        autoscroll: bool,
    },

    /// A pending local echo was confirmed by the server.
    EchoConfirmed {
        /// Context the message belongs to.
        context: ViewContext,
        /// Position of the message in the window.
        index: usize,
        /// The confirmed message.
        message: Message,
    },

    /// Older messages were inserted at the top of the window.
    OlderPrepended {
        /// Context of the window.
        context: ViewContext,
        /// Inserted messages, oldest first.
        messages: Vec<Message>,
        /// Keep this message where it was on screen.
        #[serde(skip_serializing_if = "Option::is_none")]
        anchor: Option<u64>,
        /// Whether even older messages can be loaded.
        has_more: bool,
    },

    /// An older-page request started or finished.
    LoadingOlder {
        /// Whether a request is in flight.
        active: bool,
    },

    /// The roster of the active room changed.
    RosterChanged {
        /// Room the roster belongs to.
        room: RoomName,
        /// Present users.
        members: BTreeMap<UserId, String>,
    },

    /// The list of rooms changed.
    RoomListChanged {
        /// Every room known to the server.
        rooms: Vec<RoomName>,
        /// Room to highlight.
        #[serde(skip_serializing_if = "Option::is_none")]
        active: Option<RoomName>,
    },

    /// The conversation list changed.
    ConversationsChanged {
        /// One entry per peer.
        conversations: Vec<ConversationSummary>,
    },

    /// Set the unread badge of a conversation.
    UnreadBadge {
        /// The peer.
        peer_id: PeerId,
        /// Unread messages from that peer.
        count: u32,
    },

    /// Set the global unread badge.
    UnreadTotal {
        /// Unread messages across all peers.
        total: u64,
    },

    /// Transient popup for a direct message that is not on screen.
    Toast {
        /// Sender of the message.
        peer_id: PeerId,
        /// Sender's display name.
        sender_name: String,
        /// Message text.
        preview: String,
    },

    /// A user's online indicator changed.
    PeerStatus {
        /// The user.
        user_id: UserId,
        /// Whether the user is connected.
        online: bool,
    },

    /// Show a notice.
    Notice(Notice),

    /// Connection state changed.
    ConnectionChanged {
        /// Whether the transport is connected.
        connected: bool,
    },
}
