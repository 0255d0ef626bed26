//! Deterministic simulation harness for roomlink client testing.
//!
//! In-memory implementation of the [`roomlink_app::Driver`] trait plus an
//! invariant checker and an arbitrary operation model, so that the same
//! session and runtime code that runs in production can be driven through
//! scripted and randomly generated histories.
//!
//! # Operation Model
//!
//! The `operation` module provides [`SessionOp`], an arbitrary mix of user
//! actions and server events over small domains. Property tests and fuzz
//! targets apply sequences of them and check invariants after every step.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the full set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod operation;
pub mod sim_driver;

pub use invariants::{
    Invariant, InvariantRegistry, InvariantResult, LoadingOnlyInRooms, RosterScoped,
    SessionSnapshot, UniqueMessageIds, UnreadTotalConsistent, ViewExclusive, Violation,
    WindowMatchesView, WindowOffsetMatchesLength, WindowSnapshot,
};
pub use operation::{LOCAL_USER_ID, ROOMS, SessionOp, local_session};
pub use sim_driver::{SimDriver, SimDriverError, SimStep};
