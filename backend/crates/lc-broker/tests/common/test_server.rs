use super::{RecordingNotifier, create_test_broker_with};

use lc_broker::{AppState, Broker, RateLimiterFactory, ServerEvent};
use lc_config::{BrokerConfig, RateLimitConfig, WebSocketConfig};

use axum::{Router, routing::get};
use axum_test::{TestServer, TestWebSocket};
use serde_json::json;

/// Test server with access to the broker behind it
pub struct TestServerWithState {
    pub server: TestServer,
    pub broker: Broker,
    pub notifier: RecordingNotifier,
}

pub fn create_test_server() -> TestServerWithState {
    create_test_server_with(RateLimitConfig::default())
}

/// Create a TestServer with custom rate limits
pub fn create_test_server_with(rate_limit: RateLimitConfig) -> TestServerWithState {
    let (broker, notifier) = create_test_broker_with(BrokerConfig::default());
    let app_state = AppState::new(
        broker.clone(),
        RateLimiterFactory::new(rate_limit),
        WebSocketConfig::default(),
    );

    let router = Router::new()
        .route("/ws", get(lc_broker::handler))
        .with_state(app_state);

    let server = TestServer::builder()
        .http_transport()
        .build(router)
        .expect("Failed to create test server");

    TestServerWithState {
        server,
        broker,
        notifier,
    }
}

/// WebSocket test client speaking the JSON event protocol
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server
            .get_websocket("/ws")
            .await
            .into_websocket()
            .await;
        Self { ws }
    }

    /// Connects and authenticates, returning the `channels` reply.
    pub async fn authenticated(server: &TestServer, user: &str, league: &str) -> (Self, ServerEvent) {
        let mut client = Self::connect(server).await;
        client
            .send_event(json!({
                "event": "authenticate",
                "data": { "userId": user, "username": user, "leagueId": league }
            }))
            .await;
        let reply = client.receive_event().await;
        (client, reply)
    }

    pub async fn send_event(&mut self, event: serde_json::Value) {
        self.ws.send_json(&event).await;
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn send_binary(&mut self, data: Vec<u8>) {
        self.ws
            .send_message(axum_test::WsMessage::Binary(data.into()))
            .await;
    }

    pub async fn receive_event(&mut self) -> ServerEvent {
        self.ws.receive_json::<ServerEvent>().await
    }

    pub async fn close(self) {
        self.ws.close().await;
    }
}
