//! Protocol error types.
//!
//! Every inbound event is validated against the schema for its name before
//! it reaches the client state machine. Anything that fails validation is
//! reported here instead of being passed on half-parsed.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while decoding events at the transport boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The event name is not part of the protocol.
    #[error("unknown event: {event}")]
    UnknownEvent {
        /// Name carried by the envelope.
        event: String,
    },

    /// The payload does not match the schema for its event name.
    #[error("invalid payload for {event}: {reason}")]
    InvalidPayload {
        /// Name of the event whose payload failed validation.
        event: &'static str,
        /// Description of the schema mismatch.
        reason: String,
    },

    /// The raw text is not a well-formed envelope.
    #[error("malformed envelope: {0}")]
    Json(String),
}

impl ProtocolError {
    /// Event name associated with this error, if any.
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::UnknownEvent { event } => Some(event.as_str()),
            Self::InvalidPayload { event, .. } => Some(*event),
            Self::Json(_) => None,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
