//! Local validation errors.
//!
//! These are raised before anything reaches the transport. They are never
//! fatal: the caller shows them to the user as an inline notice and the
//! session state is left untouched.

use thiserror::Error;

use crate::render::{Notice, NoticeLevel};

/// Errors returned by [`crate::Session`] user operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Attempted to open a direct conversation with ourselves.
    #[error("cannot send direct messages to yourself (user {peer_id})")]
    SelfMessage {
        /// The rejected peer, equal to the local user.
        peer_id: u64,
    },

    /// Room name is empty after trimming.
    #[error("room name is empty")]
    EmptyRoomName,

    /// Room name is shorter than the minimum.
    #[error("room name is too short ({len} < {min} characters)")]
    RoomNameTooShort {
        /// Length of the trimmed name.
        len: usize,
        /// Configured minimum.
        min: usize,
    },

    /// Room name is longer than the maximum.
    #[error("room name is too long ({len} > {max} characters)")]
    RoomNameTooLong {
        /// Length of the trimmed name.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Message is empty after trimming.
    #[error("message is empty")]
    EmptyMessage,

    /// Message is longer than the maximum.
    #[error("message is too long ({len} > {max} characters)")]
    MessageTooLong {
        /// Length of the trimmed message.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
}

impl SessionError {
    /// User-visible notice describing this error.
    pub fn to_notice(&self) -> Notice {
        Notice { level: NoticeLevel::Warning, text: self.to_string() }
    }
}
