//! Matchmaking aggregate: waiting slot, room table and per-connection state.
//!
//! All transitions are pure synchronous methods that mutate the aggregate and
//! return an outcome value; the use case layer holds the aggregate behind one
//! mutex, applies a transition under the lock, and dispatches notifications
//! derived from the outcome after releasing it. Keeping the decisions here
//! free of I/O makes every pairing and teardown rule testable in isolation.
//!
//! Invariants maintained by this type:
//! - a connection belongs to at most one room at a time;
//! - a connection occupies the waiting slot only while it belongs to no room;
//! - the waiting slot never references an unregistered connection;
//! - a room has exactly two members for its entire lifetime.

use std::collections::HashMap;

use super::{ChatRecord, ConnectionId, Room, RoomId, RoomIdFactory};

/// Lifecycle state of one registered connection.
///
/// The terminal "gone" state is modeled by removal from the state table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Waiting,
    InRoom(RoomId),
}

/// Result of a `join_queue` transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The waiting slot was empty; the caller now occupies it.
    Waiting,
    /// The caller was paired with the previously waiting connection.
    Paired {
        room_id: RoomId,
        partner: ConnectionId,
    },
    /// Duplicate request from a connection already in the waiting slot.
    AlreadyWaiting,
    /// Request from a connection already in a room.
    AlreadyInRoom,
    /// Request from a connection that was never registered.
    UnknownConnection,
}

/// Result of a `disconnect` transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    WasIdle,
    /// The connection occupied the waiting slot; the slot is now empty.
    WasWaiting,
    /// The connection was in a room; the room was torn down and the partner
    /// returned to idle.
    WasInRoom {
        room_id: RoomId,
        partner: ConnectionId,
    },
    UnknownConnection,
}

/// Live counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchStats {
    pub connections: usize,
    pub rooms: usize,
    pub waiting: bool,
}

/// Sole owner of the waiting slot and the room table.
#[derive(Debug, Default)]
pub struct Matchmaker {
    /// Single-capacity FIFO queue: the one connection seeking a partner.
    waiting: Option<ConnectionId>,
    rooms: HashMap<RoomId, Room>,
    states: HashMap<ConnectionId, ConnectionState>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly established connection as idle. Always succeeds;
    /// re-registering a known id is a no-op.
    pub fn register(&mut self, id: ConnectionId) {
        self.states.entry(id).or_insert(ConnectionState::Idle);
    }

    /// Enter the matchmaking queue.
    ///
    /// With an empty waiting slot the caller occupies it; with a different
    /// connection waiting, a room is created pairing the two and the slot is
    /// cleared — both steps of one atomic transition, so two racing callers
    /// serialized by the owning lock can never both observe an empty slot.
    /// Requests from non-idle connections are idempotent no-ops.
    pub fn join_queue(&mut self, id: &ConnectionId, now: i64) -> JoinOutcome {
        match self.states.get(id) {
            None => return JoinOutcome::UnknownConnection,
            Some(ConnectionState::Waiting) => return JoinOutcome::AlreadyWaiting,
            Some(ConnectionState::InRoom(_)) => return JoinOutcome::AlreadyInRoom,
            Some(ConnectionState::Idle) => {}
        }

        match self.waiting.take() {
            None => {
                self.waiting = Some(id.clone());
                self.states.insert(id.clone(), ConnectionState::Waiting);
                JoinOutcome::Waiting
            }
            Some(partner) => {
                let room_id = RoomIdFactory::generate();
                let room = Room::new(room_id.clone(), [partner.clone(), id.clone()], now);
                self.rooms.insert(room_id.clone(), room);
                self.states
                    .insert(partner.clone(), ConnectionState::InRoom(room_id.clone()));
                self.states
                    .insert(id.clone(), ConnectionState::InRoom(room_id.clone()));
                JoinOutcome::Paired { room_id, partner }
            }
        }
    }

    /// Append a chat message to a room's history and name the relay target.
    ///
    /// Returns the partner to relay to, or `None` when the room does not
    /// exist or the sender is not a member (stale references are dropped, not
    /// errors).
    pub fn append_message(
        &mut self,
        room_id: &RoomId,
        sender: &ConnectionId,
        message: &str,
        now: i64,
    ) -> Option<ConnectionId> {
        let room = self.rooms.get_mut(room_id)?;
        let partner = room.partner_of(sender)?.clone();
        room.append(ChatRecord {
            sender: sender.clone(),
            message: message.to_string(),
            sent_at: now,
        });
        Some(partner)
    }

    /// Name the relay target for an opaque signaling payload.
    ///
    /// Same membership rules as `append_message`, but nothing is recorded:
    /// signaling payloads pass through uninspected.
    pub fn signal_target(&self, room_id: &RoomId, sender: &ConnectionId) -> Option<ConnectionId> {
        self.rooms.get(room_id)?.partner_of(sender).cloned()
    }

    /// Tear down a room at a member's request.
    ///
    /// Returns both members (now idle) so the caller can notify them, or
    /// `None` when the room does not exist or the caller is not a member.
    pub fn leave_room(
        &mut self,
        room_id: &RoomId,
        caller: &ConnectionId,
    ) -> Option<[ConnectionId; 2]> {
        if !self.rooms.get(room_id)?.is_member(caller) {
            return None;
        }
        let room = self.rooms.remove(room_id)?;
        for member in &room.members {
            self.states
                .insert(member.clone(), ConnectionState::Idle);
        }
        Some(room.members)
    }

    /// Remove a connection entirely.
    ///
    /// Clears the waiting slot if the connection occupied it, or tears down
    /// its room exactly as `leave_room` does, returning the partner so the
    /// caller can notify it once.
    pub fn disconnect(&mut self, id: &ConnectionId) -> DisconnectOutcome {
        match self.states.remove(id) {
            None => DisconnectOutcome::UnknownConnection,
            Some(ConnectionState::Idle) => DisconnectOutcome::WasIdle,
            Some(ConnectionState::Waiting) => {
                self.waiting = None;
                DisconnectOutcome::WasWaiting
            }
            Some(ConnectionState::InRoom(room_id)) => {
                let partner = self
                    .rooms
                    .remove(&room_id)
                    .and_then(|room| room.partner_of(id).cloned());
                match partner {
                    Some(partner) => {
                        self.states
                            .insert(partner.clone(), ConnectionState::Idle);
                        DisconnectOutcome::WasInRoom { room_id, partner }
                    }
                    // Room already gone; nothing left to notify.
                    None => DisconnectOutcome::WasIdle,
                }
            }
        }
    }

    pub fn state_of(&self, id: &ConnectionId) -> Option<&ConnectionState> {
        self.states.get(id)
    }

    pub fn stats(&self) -> MatchStats {
        MatchStats {
            connections: self.states.len(),
            rooms: self.rooms.len(),
            waiting: self.waiting.is_some(),
        }
    }

    #[cfg(test)]
    fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }
}
