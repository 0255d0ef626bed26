//! Scripted replay for roomlink
//!
//! A thin shell over [`roomlink_app::Driver`] that feeds a recorded or
//! hand-written session through the generic [`roomlink_app::Runtime`] and
//! writes every render instruction as a JSON line. Useful for reproducing
//! ordering bugs without a live server.
//!
//! # Components
//!
//! - [`Step`] / [`parse`]: NDJSON script format
//! - [`ScriptDriver`]: [`roomlink_app::Driver`] over a parsed script
//! - [`run_to_end`]: run a replay, flushing output even on failure

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod script;

pub use driver::{ScriptDriver, run_to_end};
pub use error::ReplayError;
pub use script::{Step, parse};
