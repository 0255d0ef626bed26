//! Members present in the active room.

use std::collections::BTreeMap;

use roomlink_proto::{RoomName, UserId};

/// Who is in the room on screen.
///
/// Every mutator names the room it applies to and is ignored unless that
/// room is the one the roster is scoped to. The roster is left untouched
/// while a direct conversation is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRoster {
    room: RoomName,
    members: BTreeMap<UserId, String>,
}

impl PresenceRoster {
    /// Empty roster scoped to `room`.
    pub fn new(room: impl Into<RoomName>) -> Self {
        Self { room: room.into(), members: BTreeMap::new() }
    }

    /// Clear and rescope to `room`.
    pub fn reset(&mut self, room: impl Into<RoomName>) {
        self.room = room.into();
        self.members.clear();
    }

    /// Room the roster is scoped to.
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Present users, keyed by ID.
    pub fn members(&self) -> &BTreeMap<UserId, String> {
        &self.members
    }

    /// Number of present users.
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Whether `user` is present.
    pub fn contains(&self, user: UserId) -> bool {
        self.members.contains_key(&user)
    }

    /// Replace the roster with a full snapshot. Returns whether it applied.
    pub fn replace_snapshot(&mut self, room: &str, members: BTreeMap<UserId, String>) -> bool {
        if room != self.room {
            return false;
        }
        self.members = members;
        true
    }

    /// Record a join. Returns whether the roster changed.
    pub fn add_member(&mut self, room: &str, user: UserId, name: impl Into<String>) -> bool {
        if room != self.room || self.members.contains_key(&user) {
            return false;
        }
        self.members.insert(user, name.into());
        true
    }

    /// Record a departure. Returns whether the roster changed.
    pub fn remove_member(&mut self, room: &str, user: UserId) -> bool {
        room == self.room && self.members.remove(&user).is_some()
    }
}
