//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the runtime from the transport and the
//! renderer. Each frontend implements it, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::{future::Future, time::Duration};

use roomlink_client::RenderInstruction;
use roomlink_proto::{ClientEvent, Envelope};

use crate::UserCommand;

/// Abstracts I/O operations for the runtime.
///
/// # Implementations
///
/// - **Replay**: Reads a scripted session from a file, writes render
///   instructions as JSON lines (`roomlink-replay`)
/// - **Simulation**: In-memory scripted transport for tests
///   (`roomlink-harness`)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next user command.
    ///
    /// Returns `None` if no command is ready.
    fn poll_input(
        &mut self,
    ) -> impl Future<Output = Result<Option<UserCommand>, Self::Error>> + Send;

    /// Emit a request to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or the send fails.
    fn send(&mut self, event: ClientEvent) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receive the next event from the server.
    ///
    /// Returns `None` if nothing has arrived. A lost connection is reported
    /// through [`Driver::is_connected`].
    fn recv(&mut self) -> impl Future<Output = Option<Envelope>> + Send;

    /// Establish a connection to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Check if connected to the server.
    fn is_connected(&self) -> bool;

    /// Wait before the next reconnect attempt.
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Project a state change.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, instruction: &RenderInstruction) -> Result<(), Self::Error>;

    /// Close the connection and clean up resources.
    fn stop(&mut self);
}
