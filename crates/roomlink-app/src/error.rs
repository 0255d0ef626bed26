//! Runtime errors.

use thiserror::Error;

/// Errors that end a [`crate::Runtime`] run.
///
/// Everything else (rejected input, server-reported failures, undecodable
/// events, stale responses) is shown as a notice or logged and the run
/// continues.
#[derive(Error, Debug)]
pub enum RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// The driver failed.
    #[error("driver error: {0}")]
    Driver(#[source] E),

    /// The connection was lost and could not be re-established.
    #[error("server unreachable after {attempts} reconnect attempts")]
    ReconnectExhausted {
        /// Attempts made.
        attempts: u32,
    },
}
