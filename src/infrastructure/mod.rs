//! Infrastructure layer: WebSocket-backed event delivery and wire DTOs.

pub mod dto;
pub mod registry;

pub use registry::ConnectionRegistry;
