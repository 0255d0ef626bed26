//! Application layer for roomlink
//!
//! Generic runtime that wires the sans-IO [`roomlink_client::Session`] to a
//! transport and a renderer, so the same orchestration runs in production
//! frontends, the replay tool and simulation tests.
//!
//! # Components
//!
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver
//! - [`UserCommand`]: Frontend-agnostic user input
//! - [`ReconnectPolicy`]: Bounded, fixed-delay reconnection

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod input;
mod reconnect;
mod runtime;

pub use driver::Driver;
pub use error::RuntimeError;
pub use input::{CommandError, UserCommand};
pub use reconnect::{DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS, ReconnectPolicy};
pub use runtime::Runtime;
