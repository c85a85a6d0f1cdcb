//! Identifier value objects.
//!
//! Both identifiers are opaque strings generated server-side. A
//! `ConnectionId` is assigned when a WebSocket connection is accepted and is
//! stable for the connection's lifetime; a `RoomId` is generated when two
//! connections are paired and is never reused.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for one live client connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Factory for server-assigned connection identifiers.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a fresh UUIDv4-based connection id.
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// Opaque identifier for one two-party room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Factory for room identifiers.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a fresh `room-{uuid}` identifier.
    pub fn generate() -> RoomId {
        RoomId(format!("room-{}", Uuid::new_v4()))
    }
}
