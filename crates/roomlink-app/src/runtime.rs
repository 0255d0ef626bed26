//! Generic runtime for session orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`Session`]: Client state machine
//! - [`Driver`]: Platform-specific I/O

use roomlink_client::{Notice, RenderInstruction, Session, SessionAction, SessionEvent};
use roomlink_proto::{Envelope, ServerEvent};

use crate::{Driver, ReconnectPolicy, RuntimeError, UserCommand};

/// Generic runtime that orchestrates a [`Session`] and a [`Driver`].
pub struct Runtime<D: Driver> {
    driver: D,
    session: Session,
    policy: ReconnectPolicy,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime around an existing session.
    pub fn new(driver: D, session: Session, policy: ReconnectPolicy) -> Self {
        Self { driver, session, policy }
    }

    /// Run the main event loop until the user quits.
    ///
    /// Each cycle:
    /// 1. Polls the driver for a user command and applies it
    /// 2. Detects a lost connection and reconnects within the policy bounds
    /// 3. Receives and dispatches one server event
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails or the server stays unreachable
    /// for every attempt the [`ReconnectPolicy`] allows.
    pub async fn run(&mut self) -> Result<(), RuntimeError<D::Error>> {
        if let Err(e) = self.driver.connect().await {
            tracing::warn!(error = %e, "initial connection failed");
            self.reconnect().await?;
        } else {
            self.connected().await?;
        }

        loop {
            if self.process_cycle().await? {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the user quit.
    async fn process_cycle(&mut self) -> Result<bool, RuntimeError<D::Error>> {
        if let Some(command) = self.driver.poll_input().await.map_err(RuntimeError::Driver)? {
            if command == UserCommand::Quit {
                return Ok(true);
            }
            let actions = self.apply_command(command);
            self.execute(actions).await?;
        }

        if !self.driver.is_connected() {
            if self.session.is_connected() {
                let actions = self.session.handle(SessionEvent::Disconnected);
                self.execute(actions).await?;
            }
            self.reconnect().await?;
            return Ok(false);
        }

        if let Some(envelope) = self.driver.recv().await {
            self.dispatch(envelope).await?;
        }

        Ok(false)
    }

    /// Translate a user command into session actions.
    ///
    /// Rejected input becomes a notice; it never ends the run.
    fn apply_command(&mut self, command: UserCommand) -> Vec<SessionAction> {
        let result = match command {
            UserCommand::SwitchRoom { room } => Ok(self.session.switch_to_room(room)),
            UserCommand::StartDirectMessage { peer_id, name } => {
                self.session.start_direct_message(peer_id, name)
            },
            UserCommand::ReturnToRooms => Ok(self.session.return_to_rooms()),
            UserCommand::Send { text } => self.session.send_message(&text),
            UserCommand::CreateRoom { name } => self.session.create_room(&name),
            UserCommand::LoadOlder => Ok(self.session.load_older()),
            UserCommand::RefreshConversations => Ok(self.session.refresh_conversations()),
            UserCommand::RefreshRooms => Ok(self.session.refresh_rooms()),
            UserCommand::Quit => Ok(Vec::new()),
        };

        result.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "rejected user input");
            vec![SessionAction::Render(RenderInstruction::Notice(e.to_notice()))]
        })
    }

    /// Decode a server event and feed it to the session.
    async fn dispatch(&mut self, envelope: Envelope) -> Result<(), RuntimeError<D::Error>> {
        let name = envelope.event.clone();
        match ServerEvent::from_envelope(envelope) {
            Ok(event) => {
                let actions = self.session.handle(SessionEvent::Server(event));
                self.execute(actions).await
            },
            Err(e) => {
                tracing::warn!(event = %name, error = %e, "dropping undecodable event");
                Ok(())
            },
        }
    }

    /// Execute session actions in order.
    ///
    /// Requests produced while disconnected are dropped: the session
    /// re-requests everything it needs once the connection is back.
    async fn execute(&mut self, actions: Vec<SessionAction>) -> Result<(), RuntimeError<D::Error>> {
        for action in actions {
            match action {
                SessionAction::Emit(event) => {
                    if self.driver.is_connected() {
                        self.driver.send(event).await.map_err(RuntimeError::Driver)?;
                    } else {
                        tracing::debug!(event = event.name(), "not connected, dropping request");
                    }
                },
                SessionAction::Render(instruction) => {
                    self.driver.render(&instruction).map_err(RuntimeError::Driver)?;
                },
            }
        }
        Ok(())
    }

    /// Reconnect within the policy bounds.
    async fn reconnect(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let policy = self.policy;
        for attempt in policy.attempts() {
            self.driver.sleep(policy.delay).await;

            match self.driver.connect().await {
                Ok(()) => {
                    tracing::info!(attempt, "reconnected");
                    return self.connected().await;
                },
                Err(e) => {
                    let max = policy.max_attempts;
                    tracing::warn!(attempt, max, error = %e, "reconnect failed");
                },
            }
        }

        let attempts = policy.max_attempts;
        let notice = Notice::error(format!("connection lost, gave up after {attempts} attempts"));
        self.driver.render(&RenderInstruction::Notice(notice)).map_err(RuntimeError::Driver)?;
        Err(RuntimeError::ReconnectExhausted { attempts })
    }

    async fn connected(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let actions = self.session.handle(SessionEvent::Connected);
        self.execute(actions).await
    }

    /// The session being driven.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Take the driver and session back.
    pub fn into_parts(self) -> (D, Session) {
        (self.driver, self.session)
    }
}
