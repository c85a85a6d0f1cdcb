//! Anonymous pairing and relay server.
//!
//! Pairs WebSocket clients two at a time and relays chat and signaling
//! payloads between them.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --allowed-origin http://localhost:5173
//! ```

use std::sync::Arc;

use clap::Parser;
use pairlink::{
    common::logger::setup_logger,
    domain::Matchmaker,
    infrastructure::ConnectionRegistry,
    ui::Server,
    usecase::{
        ConnectUseCase, DisconnectUseCase, GetStatsUseCase, JoinQueueUseCase, LeaveRoomUseCase,
        RelaySignalUseCase, SendMessageUseCase,
    },
};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Anonymous two-party pairing and relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Origin allowed to make cross-origin requests (permissive if omitted)
    #[arg(long)]
    allowed_origin: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // 1. Shared matchmaking state and the delivery registry
    let matchmaker = Arc::new(Mutex::new(Matchmaker::new()));
    let registry = Arc::new(ConnectionRegistry::new());

    // 2. Use cases
    let connect_usecase = Arc::new(ConnectUseCase::new(matchmaker.clone(), registry.clone()));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        matchmaker.clone(),
        registry.clone(),
    ));
    let join_queue_usecase = Arc::new(JoinQueueUseCase::new(matchmaker.clone(), registry.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        matchmaker.clone(),
        registry.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(matchmaker.clone(), registry.clone()));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(
        matchmaker.clone(),
        registry.clone(),
    ));
    let get_stats_usecase = Arc::new(GetStatsUseCase::new(matchmaker.clone()));

    // 3. Create and run the server
    let server = Server::new(
        connect_usecase,
        disconnect_usecase,
        join_queue_usecase,
        send_message_usecase,
        leave_room_usecase,
        relay_signal_usecase,
        get_stats_usecase,
    );
    if let Err(e) = server
        .run(args.host, args.port, args.allowed_origin.as_deref())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
