//! Data transfer objects for the external interfaces.
//!
//! `websocket` carries the event protocol; `http` carries the read-only
//! monitoring surface.

pub mod http;
pub mod websocket;
