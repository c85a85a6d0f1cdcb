//! Anonymous two-party pairing and relay server library.
//!
//! This library pairs anonymous WebSocket clients into two-party rooms and
//! relays chat messages and opaque WebRTC signaling payloads between the two
//! paired clients until either side leaves.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
