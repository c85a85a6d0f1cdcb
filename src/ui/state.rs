//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::usecase::{
    ConnectUseCase, DisconnectUseCase, GetStatsUseCase, JoinQueueUseCase, LeaveRoomUseCase,
    RelaySignalUseCase, SendMessageUseCase,
};

/// Use cases available to the handlers; the connection handlers own no
/// matchmaking state of their own.
pub struct AppState {
    pub connect_usecase: Arc<ConnectUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub join_queue_usecase: Arc<JoinQueueUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    pub get_stats_usecase: Arc<GetStatsUseCase>,
}
