//! Client
//!
//! Action-based state reconciliation for the roomlink chat client. Decides,
//! for every inbound realtime event, whether it applies to the conversation
//! on screen, and keeps message windows, unread counters and room rosters
//! consistent across duplicated and out-of-order updates.
//!
//! # Architecture
//!
//! Sans-IO. The [`Session`] receives events ([`SessionEvent`]) and user
//! intents (methods), processes them through pure state machine logic, and
//! returns actions ([`SessionAction`]) for the caller to execute: requests to
//! emit on the transport and [`RenderInstruction`]s for the renderer.
//!
//! # Components
//!
//! - [`ViewState`]: Which room or direct conversation is on screen
//! - [`MessageWindow`]: Paginated messages of that conversation
//! - [`UnreadTracker`]: Per-peer unread counters and their total
//! - [`PresenceRoster`]: Members of the active room
//! - [`EventRouter`]: Relevance predicates for inbound events
//! - [`Session`]: Owns all of the above and routes events between them

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod event;
mod message;
mod render;
mod roster;
mod router;
mod session;
mod unread;
mod view;
mod window;

pub use config::{
    DEFAULT_PAGE_SIZE, DEFAULT_ROOM, LocalUser, MAX_MESSAGE_LEN, ROOM_NAME_MAX, ROOM_NAME_MIN,
    SessionConfig,
};
pub use error::SessionError;
pub use event::{SessionAction, SessionEvent};
pub use message::Message;
pub use render::{Notice, NoticeLevel, RenderInstruction};
pub use roster::PresenceRoster;
pub use router::{DirectRoute, Discard, EventRouter};
pub use session::Session;
pub use unread::UnreadTracker;
pub use view::{ViewContext, ViewMode, ViewState, ViewTransition};
pub use window::{AppendOutcome, MessageWindow, PageRequest, Prepended};
