//! Script driver for the replay tool.
//!
//! Implements the [`Driver`] trait over a parsed [`Step`] list. Render
//! instructions are written to the output as JSON lines; requests can be
//! echoed too, as `{"emit": [name, data]}` lines.

use std::{collections::VecDeque, io::Write, time::Duration};

use roomlink_app::{Driver, Runtime, RuntimeError, UserCommand};
use roomlink_client::{Notice, NoticeLevel, RenderInstruction};
use roomlink_proto::{ClientEvent, Envelope};
use serde_json::json;

use crate::{ReplayError, Step};

/// Driver that replays a script and writes what the session renders.
pub struct ScriptDriver<W> {
    steps: VecDeque<Step>,
    out: W,
    connected: bool,
    refused_connects: u32,
    show_emits: bool,
    realtime: bool,
}

impl<W: Write + Send> ScriptDriver<W> {
    /// Create a driver that writes to `out`.
    pub fn new(steps: Vec<Step>, out: W) -> Self {
        Self {
            steps: steps.into(),
            out,
            connected: false,
            refused_connects: 0,
            show_emits: false,
            realtime: true,
        }
    }

    /// Also write every request sent to the server.
    #[must_use]
    pub fn with_emits(mut self, show: bool) -> Self {
        self.show_emits = show;
        self
    }

    /// Whether reconnect delays are actually waited out.
    #[must_use]
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Take the output back.
    pub fn into_output(self) -> W {
        self.out
    }

    fn write_line(&mut self, value: &impl serde::Serialize) -> Result<(), ReplayError> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write + Send> Driver for ScriptDriver<W> {
    type Error = ReplayError;

    async fn poll_input(&mut self) -> Result<Option<UserCommand>, Self::Error> {
        let Some(Step::Input(_)) = self.steps.front() else {
            return Ok(self.steps.is_empty().then_some(UserCommand::Quit));
        };
        let Some(Step::Input(line)) = self.steps.pop_front() else {
            return Ok(None);
        };

        match UserCommand::parse(&line) {
            Ok(command) => Ok(Some(command)),
            Err(e) => {
                tracing::debug!(%line, error = %e, "rejected script input");
                let notice = Notice { level: NoticeLevel::Warning, text: e.to_string() };
                self.write_line(&RenderInstruction::Notice(notice))?;
                Ok(None)
            },
        }
    }

    async fn send(&mut self, event: ClientEvent) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(ReplayError::NotConnected { event: event.name() });
        }
        if self.show_emits {
            self.write_line(&json!({ "emit": event.to_envelope().to_value() }))?;
        }
        Ok(())
    }

    async fn recv(&mut self) -> Option<Envelope> {
        match self.steps.front()? {
            Step::Input(_) => None,
            Step::Server(_) => match self.steps.pop_front() {
                Some(Step::Server(envelope)) => Some(envelope),
                _ => None,
            },
            &Step::Drop { refused_reconnects } => {
                tracing::info!(refused_reconnects, "scripted connection drop");
                self.steps.pop_front();
                self.refused_connects = refused_reconnects;
                self.connected = false;
                None
            },
        }
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        if self.refused_connects > 0 {
            self.refused_connects -= 1;
            return Err(ReplayError::ConnectionRefused);
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn sleep(&mut self, duration: Duration) {
        if self.realtime {
            tokio::time::sleep(duration).await;
        }
    }

    fn render(&mut self, instruction: &RenderInstruction) -> Result<(), Self::Error> {
        self.write_line(instruction)
    }

    fn stop(&mut self) {
        self.connected = false;
        if let Err(e) = self.out.flush() {
            tracing::warn!(error = %e, "failed to flush replay output");
        }
    }
}

/// Run a replay to completion.
///
/// A clean run stops the driver itself. A failed one is stopped here, so the
/// output written before the failure is flushed.
pub async fn run_to_end<W: Write + Send>(
    runtime: &mut Runtime<ScriptDriver<W>>,
) -> Result<(), RuntimeError<ReplayError>> {
    let result = runtime.run().await;
    if result.is_err() {
        runtime.driver_mut().stop();
    }
    result
}
