//! Session invariants.
//!
//! An invariant is a property of client state that no sequence of user
//! actions, server events or connection drops may break: the unread total
//! matches its counters, the window shows what the view says is on screen,
//! and so on. Scenario tests pin down single histories; invariants are
//! checked after every step of every generated history.
//!
//! Checks never look at a [`roomlink_client::Session`] directly. They read
//! a [`SessionSnapshot`], a plain copy of everything observable, so a
//! failing snapshot can be printed and compared.
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! registry.assert_all(&SessionSnapshot::from_session(&session), "after op");
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{
    LoadingOnlyInRooms, RosterScoped, UniqueMessageIds, UnreadTotalConsistent, ViewExclusive,
    WindowMatchesView, WindowOffsetMatchesLength,
};
pub use snapshot::{SessionSnapshot, WindowSnapshot};

/// Outcome of one check.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Which invariant.
    pub invariant: &'static str,
    /// What the snapshot showed.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property every reachable session state satisfies.
pub trait Invariant: Send + Sync {
    /// Short snake_case name used in reports.
    fn name(&self) -> &'static str;

    /// Check `state`, describing the first problem found.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;
}

/// An ordered set of invariants checked together.
#[derive(Default)]
pub struct InvariantRegistry {
    checks: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every session invariant, cheapest first.
    pub fn standard() -> Self {
        Self::new()
            .with(UnreadTotalConsistent)
            .with(ViewExclusive)
            .with(WindowMatchesView)
            .with(LoadingOnlyInRooms)
            .with(RosterScoped)
            .with(WindowOffsetMatchesLength)
            .with(UniqueMessageIds)
    }

    /// Builder form of [`InvariantRegistry::add`].
    #[must_use]
    pub fn with(mut self, invariant: impl Invariant + 'static) -> Self {
        self.add(invariant);
        self
    }

    /// Register another check.
    pub fn add(&mut self, invariant: impl Invariant + 'static) {
        self.checks.push(Box::new(invariant));
    }

    /// Names of the registered checks, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|check| check.name())
    }

    /// Run every check.
    ///
    /// Unlike a single [`Invariant::check`], this does not stop at the first
    /// failure: all violations are returned.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> =
            self.checks.iter().filter_map(|check| check.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every check and panic with the snapshot if any fails.
    ///
    /// For tests and fuzz targets; `context` says which step broke.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SessionSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };

        let report: String = violations.iter().map(|v| format!("\n  {v}")).collect();
        panic!("session invariants broken {context}:{report}\nstate: {state:#?}");
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
