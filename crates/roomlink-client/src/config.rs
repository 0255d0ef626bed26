//! Session configuration.

/// Room every session starts in.
pub const DEFAULT_ROOM: &str = "general_chat";

/// Messages requested per history page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Shortest accepted room name, in characters.
pub const ROOM_NAME_MIN: usize = 2;

/// Longest accepted room name, in characters.
pub const ROOM_NAME_MAX: usize = 20;

/// Longest accepted message, in characters.
pub const MAX_MESSAGE_LEN: usize = 1000;

/// The authenticated user this session acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalUser {
    /// Server-assigned user ID.
    pub id: u64,
    /// Display name, used for local echoes.
    pub username: String,
}

impl LocalUser {
    /// Create a local user.
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self { id, username: username.into() }
    }
}

/// Tunables for a [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// The user this session acts for.
    pub local_user: LocalUser,
    /// Room opened at session start and after a failed room lookup.
    pub default_room: String,
    /// Messages requested per history page.
    pub page_size: u32,
    /// Shortest accepted room name, in characters.
    pub room_name_min: usize,
    /// Longest accepted room name, in characters.
    pub room_name_max: usize,
    /// Longest accepted message, in characters.
    pub max_message_len: usize,
}

impl SessionConfig {
    /// Configuration with default limits for the given user.
    pub fn new(local_user: LocalUser) -> Self {
        Self {
            local_user,
            default_room: DEFAULT_ROOM.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            room_name_min: ROOM_NAME_MIN,
            room_name_max: ROOM_NAME_MAX,
            max_message_len: MAX_MESSAGE_LEN,
        }
    }

    /// Override the starting room.
    #[must_use]
    pub fn with_default_room(mut self, room: impl Into<String>) -> Self {
        self.default_room = room.into();
        self
    }

    /// Override the history page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}
