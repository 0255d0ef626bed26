//! Paginated message window.
//!
//! A [`MessageWindow`] holds the messages of exactly one conversation,
//! oldest first. It is reset on every view switch and guards its own
//! pagination: at most one older-page request is in flight, and responses
//! for a context the window no longer belongs to are rejected.
//!
//! `offset` counts messages from the newest end of the history, which is
//! what the server expects in the next page request. Local echoes count
//! too: the server stores them as soon as the send arrives.

use roomlink_proto::RoomName;
use serde::Serialize;

use crate::{message::Message, view::ViewContext};

/// Older-page request to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Room being paginated.
    pub room: RoomName,
    /// Messages already held, counted from the newest.
    pub offset: u64,
    /// Page size.
    pub limit: u32,
}

/// Result of offering a live message to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Added at the end.
    Appended,
    /// Replaced a pending local echo in place.
    EchoConfirmed {
        /// Position of the replaced echo.
        index: usize,
    },
    /// A message with the same ID is already present.
    Duplicate,
    /// The message belongs to another conversation.
    WrongContext,
}

/// Result of a completed older-page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prepended {
    /// Messages actually inserted after deduplication.
    pub inserted: usize,
    /// ID of the message that was oldest before the insert. The renderer
    /// keeps this message where it was on screen.
    pub anchor: Option<u64>,
}

/// Ordered message list for the conversation on screen.
#[derive(Debug, Clone)]
pub struct MessageWindow {
    context: ViewContext,
    messages: Vec<Message>,
    offset: u64,
    has_more: bool,
    is_loading_older: bool,
    initial_loaded: bool,
}

impl MessageWindow {
    /// Empty window for `context`.
    pub fn new(context: ViewContext) -> Self {
        Self {
            context,
            messages: Vec::new(),
            offset: 0,
            has_more: true,
            is_loading_older: false,
            initial_loaded: false,
        }
    }

    /// Clear the window and bind it to `context`.
    pub fn reset(&mut self, context: ViewContext) {
        *self = Self::new(context);
    }

    /// Conversation this window belongs to.
    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    /// Messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages loaded so far, counted from the newest.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether older messages exist server-side.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether an older-page request is in flight.
    pub fn is_loading_older(&self) -> bool {
        self.is_loading_older
    }

    /// Whether the initial history has arrived.
    pub fn is_initial_loaded(&self) -> bool {
        self.initial_loaded
    }

    /// Replace the contents with the most recent history page.
    ///
    /// Local echoes still awaiting confirmation were sent after the history
    /// was requested, so they stay after the page unless the page already
    /// holds their server copy. Returns `false` without touching anything if
    /// the page belongs to a different conversation.
    pub fn complete_initial(
        &mut self,
        context: &ViewContext,
        messages: Vec<Message>,
        has_more: bool,
    ) -> bool {
        if &self.context != context {
            return false;
        }

        let mut page: Vec<Message> = Vec::with_capacity(messages.len());
        for message in messages {
            if message.id.is_none() || !page.iter().any(|m| m.id == message.id) {
                page.push(message);
            }
        }

        let mut kept = 0;
        for echo in std::mem::take(&mut self.messages) {
            if echo.is_pending_echo() && !page.iter().any(|m| m.confirms(&echo)) {
                page.push(echo);
                kept += 1;
            }
        }
        if kept > 0 {
            tracing::debug!(kept, "kept pending echoes across history load");
        }

        self.messages = page;
        self.sync_offset();
        self.has_more = has_more;
        self.is_loading_older = false;
        self.initial_loaded = true;
        true
    }

    /// Start an older-page load.
    ///
    /// Returns `None` if a load is already in flight, nothing older exists,
    /// the initial page has not arrived, the window is not a room, or
    /// `current` (the context on screen) no longer matches the window.
    pub fn begin_older(&mut self, current: &ViewContext, limit: u32) -> Option<PageRequest> {
        if self.is_loading_older || !self.has_more || !self.initial_loaded {
            return None;
        }
        if &self.context != current {
            return None;
        }
        let room = self.context.room()?.to_string();

        self.is_loading_older = true;
        Some(PageRequest { room, offset: self.offset, limit })
    }

    /// Finish an older-page load by prepending `messages` (oldest first).
    ///
    /// Returns `None` if no load is in flight or the page is for another
    /// room; such pages are stale and must be dropped.
    pub fn complete_older(
        &mut self,
        room: &str,
        messages: Vec<Message>,
        has_more: bool,
    ) -> Option<Prepended> {
        if !self.is_loading_older || self.context.room() != Some(room) {
            return None;
        }

        let anchor = self.messages.iter().find_map(|m| m.id);

        let mut fresh: Vec<Message> = Vec::with_capacity(messages.len());
        for message in messages {
            let seen = message.id.is_some()
                && (self.messages.iter().any(|m| m.id == message.id)
                    || fresh.iter().any(|m| m.id == message.id));
            if !seen {
                fresh.push(message);
            }
        }

        let inserted = fresh.len();
        fresh.append(&mut self.messages);
        self.messages = fresh;
        self.sync_offset();
        self.has_more = has_more;
        self.is_loading_older = false;

        Some(Prepended { inserted, anchor })
    }

    /// Abort an in-flight older-page load after a server error.
    ///
    /// Returns whether a load was in flight.
    pub fn fail_older(&mut self) -> bool {
        std::mem::replace(&mut self.is_loading_older, false)
    }

    /// Offer a live message.
    ///
    /// Messages with an ID already present are dropped. A server copy that
    /// confirms a pending local echo replaces the echo where it stands.
    pub fn append_live(&mut self, message: Message) -> AppendOutcome {
        if message.context != self.context {
            return AppendOutcome::WrongContext;
        }

        if message.id.is_some() {
            if self.messages.iter().any(|m| m.id == message.id) {
                return AppendOutcome::Duplicate;
            }

            if let Some(index) = self.messages.iter().position(|echo| message.confirms(echo)) {
                self.messages[index] = message;
                return AppendOutcome::EchoConfirmed { index };
            }
        }

        self.messages.push(message);
        self.sync_offset();
        AppendOutcome::Appended
    }

    /// Attach a server ID to the oldest pending echo.
    ///
    /// Used when the server acknowledges a send without echoing the message
    /// back. Returns the index of the confirmed echo, or `None` if there is
    /// no pending echo or a message with `id` is already held (its server
    /// copy got here first).
    pub fn confirm_oldest_echo(&mut self, id: u64) -> Option<usize> {
        if self.messages.iter().any(|m| m.id == Some(id)) {
            return None;
        }
        let index = self.messages.iter().position(Message::is_pending_echo)?;

        let echo = &mut self.messages[index];
        echo.id = Some(id);
        echo.is_local_echo = false;
        Some(index)
    }

    /// Forget any in-flight load; its response will never arrive.
    pub fn abandon_pending(&mut self) {
        self.is_loading_older = false;
    }

    // Every message held counts toward the next page request.
    fn sync_offset(&mut self) {
        self.offset = self.messages.len() as u64;
    }
}
