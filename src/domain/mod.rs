//! Domain layer: value objects, the room entity, the matchmaking aggregate
//! and the outbound-delivery abstraction.
//!
//! Everything in this module is pure and synchronous except the
//! [`EventPusher`] trait, whose implementations live in the infrastructure
//! layer (dependency inversion: the domain defines the interface it needs).

mod ids;
mod matchmaker;
mod pusher;
mod room;

pub use ids::{ConnectionId, ConnectionIdFactory, RoomId, RoomIdFactory};
pub use matchmaker::{ConnectionState, DisconnectOutcome, JoinOutcome, MatchStats, Matchmaker};
pub use pusher::{EventPusher, PushError, PusherChannel};
pub use room::{ChatRecord, Room};

#[cfg(test)]
pub use pusher::MockEventPusher;
