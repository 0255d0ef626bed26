//! Wire protocol for the roomlink chat client.
//!
//! The chat server speaks named realtime events carrying JSON payloads. This
//! crate turns those duck-typed payloads into tagged variants with a fixed
//! schema per event name, validated once at the transport boundary.
//!
//! # Components
//!
//! - [`Envelope`]: An event name plus its raw JSON data, as carried by the
//!   transport (`["event_name", {data}]`).
//! - [`ClientEvent`]: Requests the client emits to the server.
//! - [`ServerEvent`]: Events the server delivers to the client.
//! - [`ProtocolError`]: Rejections produced while validating inbound events.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod envelope;
mod errors;
pub mod server;
pub mod types;

pub use client::ClientEvent;
pub use envelope::Envelope;
pub use errors::{ProtocolError, Result};
pub use server::ServerEvent;
pub use types::{ConversationSummary, PeerId, RoomName, UserId, WireDirectMessage, WireMessage};
