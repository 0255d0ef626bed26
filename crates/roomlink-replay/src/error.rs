//! Replay errors.

use std::io;

use thiserror::Error;

/// Replay driver errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// I/O error reading the script or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Output serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A script line is not a valid step.
    #[error("script line {line}: {reason}")]
    Script {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The script refused a connection attempt.
    #[error("connection refused")]
    ConnectionRefused,

    /// A request was sent while the scripted connection was down.
    #[error("cannot send {event}: not connected")]
    NotConnected {
        /// Wire name of the request.
        event: &'static str,
    },
}
