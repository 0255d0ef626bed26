//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` replays a fixed script of user commands, server events and
//! connection drops. It implements [`Driver`] so the same
//! [`roomlink_app::Runtime`] orchestration code runs in production and in
//! tests. Nothing sleeps: reconnect delays are recorded instead.

use std::{collections::VecDeque, time::Duration};

use roomlink_app::{Driver, UserCommand};
use roomlink_client::{RenderInstruction, Session};
use roomlink_proto::{ClientEvent, Envelope, ServerEvent};

use crate::invariants::{InvariantRegistry, SessionSnapshot};

/// Failures the simulated connection reports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimDriverError {
    /// A scripted refusal.
    #[error("connection refused")]
    Refused,
    /// A request was sent with no connection up.
    #[error("cannot send {event} while disconnected")]
    NotConnected {
        /// Wire name of the dropped request.
        event: &'static str,
    },
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq)]
pub enum SimStep {
    /// The user does something.
    Input(UserCommand),
    /// The server delivers an event.
    Server(Envelope),
    /// The connection drops.
    Drop,
}

/// Simulation driver for deterministic testing.
///
/// Steps are consumed in order: user commands through
/// [`Driver::poll_input`], server events and drops through [`Driver::recv`].
/// Once the script is exhausted the driver reports [`UserCommand::Quit`].
#[derive(Default)]
pub struct SimDriver {
    script: VecDeque<SimStep>,
    connected: bool,
    refused_connects: u32,
    connect_attempts: u32,
    sent: Vec<ClientEvent>,
    rendered: Vec<RenderInstruction>,
    sleeps: Vec<Duration>,
    stopped: bool,
    invariants: Option<InvariantRegistry>,
}

impl SimDriver {
    /// Create a new simulation driver with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable invariant checking.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Queue a user command.
    pub fn push_input(&mut self, command: UserCommand) {
        self.script.push_back(SimStep::Input(command));
    }

    /// Queue a server event.
    pub fn push_server(&mut self, event: &ServerEvent) {
        self.script.push_back(SimStep::Server(event.to_envelope()));
    }

    /// Queue a raw envelope, which may not decode.
    pub fn push_envelope(&mut self, envelope: Envelope) {
        self.script.push_back(SimStep::Server(envelope));
    }

    /// Queue a connection drop.
    pub fn push_drop(&mut self) {
        self.script.push_back(SimStep::Drop);
    }

    /// Refuse the next `count` connection attempts.
    pub fn refuse_connects(&mut self, count: u32) {
        self.refused_connects = count;
    }

    /// Requests the runtime emitted, in order.
    pub fn sent(&self) -> &[ClientEvent] {
        &self.sent
    }

    /// Take all captured requests.
    pub fn take_sent(&mut self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.sent)
    }

    /// Render instructions received, in order.
    pub fn rendered(&self) -> &[RenderInstruction] {
        &self.rendered
    }

    /// Reconnect delays requested.
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    /// Connection attempts made, successful or not.
    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }

    /// Whether [`Driver::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Check if there are scripted steps left.
    pub fn has_pending(&self) -> bool {
        !self.script.is_empty()
    }

    /// Check invariants against session state.
    pub fn check_invariants(&self, session: &Session, context: &str) {
        if let Some(ref registry) = self.invariants {
            registry.assert_all(&SessionSnapshot::from_session(session), context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_input(&mut self) -> Result<Option<UserCommand>, Self::Error> {
        match self.script.front() {
            None => Ok(Some(UserCommand::Quit)),
            Some(SimStep::Input(_)) => match self.script.pop_front() {
                Some(SimStep::Input(command)) => Ok(Some(command)),
                _ => Ok(None),
            },
            Some(_) => Ok(None),
        }
    }

    async fn send(&mut self, event: ClientEvent) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(SimDriverError::NotConnected { event: event.name() });
        }
        self.sent.push(event);
        Ok(())
    }

    async fn recv(&mut self) -> Option<Envelope> {
        match self.script.front() {
            Some(SimStep::Server(_)) => match self.script.pop_front() {
                Some(SimStep::Server(envelope)) => Some(envelope),
                _ => None,
            },
            Some(SimStep::Drop) => {
                tracing::debug!(remaining = self.script.len() - 1, "simulated connection drop");
                self.script.pop_front();
                self.connected = false;
                None
            },
            Some(SimStep::Input(_)) | None => None,
        }
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.connect_attempts += 1;
        if self.refused_connects > 0 {
            self.refused_connects -= 1;
            tracing::debug!(attempt = self.connect_attempts, "simulated connect refused");
            return Err(SimDriverError::Refused);
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }

    fn render(&mut self, instruction: &RenderInstruction) -> Result<(), Self::Error> {
        self.rendered.push(instruction.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.connected = false;
        self.stopped = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roomlink_proto::server::UserStatus;

    use super::*;

    #[tokio::test]
    async fn exhausted_script_quits() {
        let mut driver = SimDriver::new();
        assert_eq!(driver.poll_input().await.unwrap(), Some(UserCommand::Quit));
    }

    #[tokio::test]
    async fn steps_are_consumed_by_the_matching_side() {
        let mut driver = SimDriver::new();
        driver.push_server(&ServerEvent::UserStatus(UserStatus { user_id: 2, online: true }));
        driver.push_input(UserCommand::LoadOlder);

        // Server step first: input side waits.
        assert_eq!(driver.poll_input().await.unwrap(), None);
        assert!(driver.recv().await.is_some());
        assert_eq!(driver.poll_input().await.unwrap(), Some(UserCommand::LoadOlder));
        assert!(!driver.has_pending());
    }

    #[tokio::test]
    async fn drop_disconnects() {
        let mut driver = SimDriver::new();
        driver.connect().await.unwrap();
        driver.push_drop();

        assert!(driver.recv().await.is_none());
        assert!(!driver.is_connected());
    }

    #[tokio::test]
    async fn refused_connects_are_counted() {
        let mut driver = SimDriver::new();
        driver.refuse_connects(1);

        assert_eq!(driver.connect().await, Err(SimDriverError::Refused));
        assert!(driver.connect().await.is_ok());
        assert_eq!(driver.connect_attempts(), 2);
    }
}
