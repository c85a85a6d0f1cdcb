//! Integration tests driving a real in-process server over WebSocket.
//!
//! Each test boots the full dependency graph on an ephemeral port and talks
//! the actual wire protocol with `tokio-tungstenite` clients.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use pairlink::{
    domain::Matchmaker,
    infrastructure::ConnectionRegistry,
    ui::Server,
    usecase::{
        ConnectUseCase, DisconnectUseCase, GetStatsUseCase, JoinQueueUseCase, LeaveRoomUseCase,
        RelaySignalUseCase, SendMessageUseCase,
    },
};

const EVENT_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// Boot a full server on an ephemeral port; returns (ws_url, http_url).
async fn start_server() -> (String, String) {
    let matchmaker = Arc::new(Mutex::new(Matchmaker::new()));
    let registry = Arc::new(ConnectionRegistry::new());

    let server = Server::new(
        Arc::new(ConnectUseCase::new(matchmaker.clone(), registry.clone())),
        Arc::new(DisconnectUseCase::new(matchmaker.clone(), registry.clone())),
        Arc::new(JoinQueueUseCase::new(matchmaker.clone(), registry.clone())),
        Arc::new(SendMessageUseCase::new(matchmaker.clone(), registry.clone())),
        Arc::new(LeaveRoomUseCase::new(matchmaker.clone(), registry.clone())),
        Arc::new(RelaySignalUseCase::new(matchmaker.clone(), registry.clone())),
        Arc::new(GetStatsUseCase::new(matchmaker.clone())),
    );

    let app = server.into_router(None).expect("failed to build router");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    (format!("ws://{}/ws", addr), format!("http://{}", addr))
}

/// One WebSocket client speaking the event protocol.
struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn connect(ws_url: &str) -> Self {
        let (ws, _) = connect_async(ws_url).await.expect("failed to connect");
        Self { ws }
    }

    async fn send(&mut self, event: Value) {
        self.ws
            .send(Message::Text(event.to_string().into()))
            .await
            .expect("failed to send frame");
    }

    async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("failed to send frame");
    }

    /// Receive the next event, skipping non-text frames.
    async fn recv(&mut self) -> Value {
        loop {
            let frame = timeout(EVENT_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for an event")
                .expect("connection closed")
                .expect("websocket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("invalid event JSON");
            }
        }
    }

    /// Assert that no event arrives within the silence window.
    async fn expect_silence(&mut self) {
        let result = timeout(SILENCE_WINDOW, self.ws.next()).await;
        assert!(
            result.is_err(),
            "expected no event, got {:?}",
            result.unwrap()
        );
    }

    async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

async fn join_queue(client: &mut TestClient) {
    client.send(json!({"type": "joinQueue"})).await;
}

/// Pair two fresh clients and return their shared room id.
async fn pair(a: &mut TestClient, b: &mut TestClient) -> String {
    join_queue(a).await;
    let waiting = a.recv().await;
    assert_eq!(waiting["type"], "waiting");

    join_queue(b).await;
    let start_a = a.recv().await;
    let start_b = b.recv().await;
    assert_eq!(start_a["type"], "startChat");
    assert_eq!(start_b["type"], "startChat");
    assert_eq!(start_a["roomId"], start_b["roomId"]);

    start_a["roomId"].as_str().expect("missing roomId").to_string()
}

#[tokio::test]
async fn test_two_clients_are_paired_and_a_third_waits() {
    // given:
    let (ws_url, _) = start_server().await;
    let mut a = TestClient::connect(&ws_url).await;
    let mut b = TestClient::connect(&ws_url).await;
    let mut c = TestClient::connect(&ws_url).await;

    // when:
    let room_id = pair(&mut a, &mut b).await;

    // then: a real room id was issued and the slot is free for c
    assert!(room_id.starts_with("room-"));
    join_queue(&mut c).await;
    let waiting = c.recv().await;
    assert_eq!(waiting["type"], "waiting");
    assert!(waiting["status"].as_str().is_some());
}

#[tokio::test]
async fn test_message_relay_leave_and_requeue_scenario() {
    // given: x, y, z join in that order; x+y share a room, z waits
    let (ws_url, _) = start_server().await;
    let mut x = TestClient::connect(&ws_url).await;
    let mut y = TestClient::connect(&ws_url).await;
    let mut z = TestClient::connect(&ws_url).await;
    let room_id = pair(&mut x, &mut y).await;
    join_queue(&mut z).await;
    assert_eq!(z.recv().await["type"], "waiting");

    // when: x sends a chat message
    x.send(json!({"type": "sendMessage", "roomId": room_id, "message": "hello"}))
        .await;

    // then: y receives it with x's sender identity; z receives nothing
    let received = y.recv().await;
    assert_eq!(received["type"], "receiveMessage");
    assert_eq!(received["message"], "hello");
    let x_id = received["sender"].as_str().expect("missing sender").to_string();
    assert!(!x_id.is_empty());
    z.expect_silence().await;

    // when: y leaves the room
    y.send(json!({"type": "leaveRoom", "roomId": room_id})).await;

    // then: both members are notified of session end
    assert_eq!(x.recv().await["type"], "endChat");
    assert_eq!(y.recv().await["type"], "endChat");

    // and: x is idle again and pairs with the still-waiting z in a new room
    join_queue(&mut x).await;
    let start_x = x.recv().await;
    let start_z = z.recv().await;
    assert_eq!(start_x["type"], "startChat");
    assert_eq!(start_z["type"], "startChat");
    assert_eq!(start_x["roomId"], start_z["roomId"]);
    assert_ne!(start_x["roomId"].as_str().unwrap(), room_id);
}

#[tokio::test]
async fn test_waiting_client_disconnect_clears_the_slot() {
    // given: w occupies the waiting slot
    let (ws_url, _) = start_server().await;
    let mut w = TestClient::connect(&ws_url).await;
    join_queue(&mut w).await;
    assert_eq!(w.recv().await["type"], "waiting");

    // when: w disconnects before any pairing
    w.close().await;
    sleep(Duration::from_millis(200)).await;

    // then: a new connection becomes the waiting one, no stale pairing
    let mut n = TestClient::connect(&ws_url).await;
    join_queue(&mut n).await;
    assert_eq!(n.recv().await["type"], "waiting");

    // and: the next caller pairs with n
    let mut m = TestClient::connect(&ws_url).await;
    join_queue(&mut m).await;
    assert_eq!(n.recv().await["type"], "startChat");
    assert_eq!(m.recv().await["type"], "startChat");
}

#[tokio::test]
async fn test_disconnect_in_room_notifies_the_partner() {
    // given:
    let (ws_url, _) = start_server().await;
    let mut a = TestClient::connect(&ws_url).await;
    let mut b = TestClient::connect(&ws_url).await;
    pair(&mut a, &mut b).await;

    // when: a drops the connection without leaving
    a.close().await;

    // then: b is notified exactly once and is idle again
    assert_eq!(b.recv().await["type"], "endChat");
    b.expect_silence().await;
    join_queue(&mut b).await;
    assert_eq!(b.recv().await["type"], "waiting");
}

#[tokio::test]
async fn test_video_signal_is_relayed_verbatim() {
    // given:
    let (ws_url, _) = start_server().await;
    let mut a = TestClient::connect(&ws_url).await;
    let mut b = TestClient::connect(&ws_url).await;
    let room_id = pair(&mut a, &mut b).await;
    let blob = json!({"typ": "offer", "sdp": "v=0\r\no=- 0 0 IN IP4 127.0.0.1"});

    // when:
    a.send(json!({"type": "videoSignal", "roomId": room_id, "signal": blob}))
        .await;
    a.send(json!({"type": "sendMessage", "roomId": room_id, "message": "after"}))
        .await;

    // then: the payload arrives untouched, with a's identity on both events
    let signal = b.recv().await;
    assert_eq!(signal["type"], "videoSignal");
    assert_eq!(signal["signal"], blob);
    let chat = b.recv().await;
    assert_eq!(chat["sender"], signal["sender"]);
}

#[tokio::test]
async fn test_stale_and_malformed_input_is_ignored() {
    // given:
    let (ws_url, _) = start_server().await;
    let mut a = TestClient::connect(&ws_url).await;

    // when: a message for a room that never existed, then a garbage frame
    a.send(json!({"type": "sendMessage", "roomId": "room-bogus", "message": "hi"}))
        .await;
    a.send_raw("not json at all").await;

    // then: nothing comes back and the connection still works
    a.expect_silence().await;
    join_queue(&mut a).await;
    assert_eq!(a.recv().await["type"], "waiting");
}

#[tokio::test]
async fn test_health_endpoint_reports_live_counts() {
    // given:
    let (ws_url, http_url) = start_server().await;
    let health_url = format!("{}/api/health", http_url);

    let empty: Value = reqwest::get(&health_url).await.unwrap().json().await.unwrap();
    assert_eq!(empty["status"], "ok");
    assert_eq!(empty["connections"], 0);
    assert_eq!(empty["rooms"], 0);
    assert_eq!(empty["waiting"], false);

    // when: one client waits and a second gets paired
    let mut a = TestClient::connect(&ws_url).await;
    join_queue(&mut a).await;
    assert_eq!(a.recv().await["type"], "waiting");

    let one: Value = reqwest::get(&health_url).await.unwrap().json().await.unwrap();
    assert_eq!(one["connections"], 1);
    assert_eq!(one["waiting"], true);

    let mut b = TestClient::connect(&ws_url).await;
    join_queue(&mut b).await;
    assert_eq!(a.recv().await["type"], "startChat");
    assert_eq!(b.recv().await["type"], "startChat");

    // then:
    let paired: Value = reqwest::get(&health_url).await.unwrap().json().await.unwrap();
    assert_eq!(paired["connections"], 2);
    assert_eq!(paired["rooms"], 1);
    assert_eq!(paired["waiting"], false);
}
