//! UI layer: axum HTTP/WebSocket wiring.

mod handler;
mod server;
mod signal;
mod state;

pub use server::Server;
pub use state::AppState;
