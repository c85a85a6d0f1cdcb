//! Server execution logic.

use std::sync::Arc;

use axum::{Router, http::HeaderValue, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::usecase::{
    ConnectUseCase, DisconnectUseCase, GetStatsUseCase, JoinQueueUseCase, LeaveRoomUseCase,
    RelaySignalUseCase, SendMessageUseCase,
};

use super::{
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// The pairing server.
///
/// Encapsulates the wired use cases and exposes methods to build the router
/// and run the server.
pub struct Server {
    connect_usecase: Arc<ConnectUseCase>,
    disconnect_usecase: Arc<DisconnectUseCase>,
    join_queue_usecase: Arc<JoinQueueUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    relay_signal_usecase: Arc<RelaySignalUseCase>,
    get_stats_usecase: Arc<GetStatsUseCase>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connect_usecase: Arc<ConnectUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        join_queue_usecase: Arc<JoinQueueUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        relay_signal_usecase: Arc<RelaySignalUseCase>,
        get_stats_usecase: Arc<GetStatsUseCase>,
    ) -> Self {
        Self {
            connect_usecase,
            disconnect_usecase,
            join_queue_usecase,
            send_message_usecase,
            leave_room_usecase,
            relay_signal_usecase,
            get_stats_usecase,
        }
    }

    /// Build the axum router.
    ///
    /// With an explicit `allowed_origin` only that origin may make
    /// cross-origin requests; without one the CORS layer is permissive.
    pub fn into_router(
        self,
        allowed_origin: Option<&str>,
    ) -> Result<Router, Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_usecase: self.connect_usecase,
            disconnect_usecase: self.disconnect_usecase,
            join_queue_usecase: self.join_queue_usecase,
            send_message_usecase: self.send_message_usecase,
            leave_room_usecase: self.leave_room_usecase,
            relay_signal_usecase: self.relay_signal_usecase,
            get_stats_usecase: self.get_stats_usecase,
        });

        let cors = match allowed_origin {
            Some(origin) => CorsLayer::new()
                .allow_origin(origin.parse::<HeaderValue>()?)
                .allow_methods(Any)
                .allow_headers(Any),
            None => CorsLayer::permissive(),
        };

        Ok(Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .with_state(app_state)
            .layer(TraceLayer::new_for_http())
            .layer(cors))
    }

    /// Run the pairing server.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    /// * `allowed_origin` - Optional CORS origin for browser clients
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(
        self,
        host: String,
        port: u16,
        allowed_origin: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router(allowed_origin)?;

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("pairing server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
