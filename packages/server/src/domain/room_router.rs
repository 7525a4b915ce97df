//! Room membership table.
//!
//! Maps canonical room keys to the live connections currently in them. A
//! room exists exactly while it has at least one member: it is created on
//! first join and dropped when the last member leaves. Nothing here is
//! persisted; clients rebuild membership by re-joining after a restart.
//!
//! The router is a plain single-owner value. The broadcaster task owns the
//! only instance, which serializes every mutation.

use std::collections::{BTreeSet, HashMap};

use super::{ConnectionId, RoomKey};

#[derive(Debug, Default)]
pub struct RoomRouter {
    rooms: HashMap<RoomKey, BTreeSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, BTreeSet<RoomKey>>,
}

impl RoomRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection` to `room_key`.
    ///
    /// Idempotent: returns `false` if the connection was already a member.
    pub fn join(&mut self, connection: ConnectionId, room_key: RoomKey) -> bool {
        let added = self
            .rooms
            .entry(room_key.clone())
            .or_default()
            .insert(connection);
        if added {
            self.memberships
                .entry(connection)
                .or_default()
                .insert(room_key);
        }
        added
    }

    /// Remove `connection` from `room_key`. Returns `false` if it was not a member.
    pub fn leave(&mut self, connection: ConnectionId, room_key: &RoomKey) -> bool {
        let Some(members) = self.rooms.get_mut(room_key) else {
            return false;
        };
        let removed = members.remove(&connection);
        if members.is_empty() {
            self.rooms.remove(room_key);
        }
        if removed && let Some(keys) = self.memberships.get_mut(&connection) {
            keys.remove(room_key);
            if keys.is_empty() {
                self.memberships.remove(&connection);
            }
        }
        removed
    }

    /// Remove `connection` from every room it belongs to.
    ///
    /// Returns the keys it was removed from, sorted.
    pub fn leave_all(&mut self, connection: ConnectionId) -> Vec<RoomKey> {
        let Some(keys) = self.memberships.remove(&connection) else {
            return Vec::new();
        };
        for room_key in &keys {
            if let Some(members) = self.rooms.get_mut(room_key) {
                members.remove(&connection);
                if members.is_empty() {
                    self.rooms.remove(room_key);
                }
            }
        }
        keys.into_iter().collect()
    }

    /// Connections in `room_key`, in allocation order.
    pub fn members(&self, room_key: &RoomKey) -> Vec<ConnectionId> {
        self.rooms
            .get(room_key)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Relay targets: every member of `room_key` except `origin`.
    pub fn peers(&self, room_key: &RoomKey, origin: ConnectionId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_key)
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|id| *id != origin)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rooms `connection` currently belongs to.
    pub fn rooms_of(&self, connection: ConnectionId) -> Vec<RoomKey> {
        self.memberships
            .get(&connection)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn is_member(&self, connection: ConnectionId, room_key: &RoomKey) -> bool {
        self.rooms
            .get(room_key)
            .is_some_and(|members| members.contains(&connection))
    }

    /// Number of live (non-empty) rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
