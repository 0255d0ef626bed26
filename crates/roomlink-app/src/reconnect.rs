//! Bounded reconnection.

use std::time::Duration;

/// Attempts made before giving up on the server.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Pause before each attempt.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// How the runtime re-establishes a lost connection.
///
/// Retries at a fixed delay, a fixed number of times. There is no backoff:
/// the server either comes back quickly or the user is told it is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Attempts before giving up. Zero disables reconnection.
    pub max_attempts: u32,
    /// Pause before each attempt.
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, delay: DEFAULT_DELAY }
    }
}

impl ReconnectPolicy {
    /// Policy with explicit bounds.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Policy that never retries.
    pub fn disabled() -> Self {
        Self { max_attempts: 0, delay: Duration::ZERO }
    }

    /// Attempt numbers, starting at 1. The iterator does not borrow the
    /// policy.
    pub fn attempts(&self) -> impl Iterator<Item = u32> + use<> {
        1..=self.max_attempts
    }
}
