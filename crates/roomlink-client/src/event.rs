//! Session inputs and outputs.

use roomlink_proto::{ClientEvent, ServerEvent};

use crate::render::RenderInstruction;

/// Events the caller feeds into the session.
///
/// User intents are not events: they are methods on [`crate::Session`]
/// because they can be rejected locally before anything is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The transport (re)connected.
    ///
    /// Cached server state is not trusted across a disconnect; the session
    /// re-requests every snapshot it depends on.
    Connected,

    /// The transport lost its connection.
    Disconnected,

    /// An event arrived from the server.
    Server(ServerEvent),
}

/// Actions the session produces for the caller to execute, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Emit a request to the server.
    Emit(ClientEvent),

    /// Forward an instruction to the renderer.
    Render(RenderInstruction),
}

impl SessionAction {
    /// The request, if this is an emit.
    pub fn as_emit(&self) -> Option<&ClientEvent> {
        match self {
            Self::Emit(event) => Some(event),
            Self::Render(_) => None,
        }
    }

    /// The instruction, if this is a render.
    pub fn as_render(&self) -> Option<&RenderInstruction> {
        match self {
            Self::Emit(_) => None,
            Self::Render(instruction) => Some(instruction),
        }
    }
}
