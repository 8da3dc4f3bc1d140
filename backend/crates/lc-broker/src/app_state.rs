use crate::{
    Broker, ConnectionId, ConnectionRateLimiter, OutboundFrame, RateLimiterFactory,
    WebSocketConnection,
};

use lc_config::WebSocketConfig;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub broker: Broker,
    pub rate_limiter_factory: RateLimiterFactory,
    pub config: WebSocketConfig,
}

impl AppState {
    pub fn new(
        broker: Broker,
        rate_limiter_factory: RateLimiterFactory,
        config: WebSocketConfig,
    ) -> Self {
        Self {
            broker,
            rate_limiter_factory,
            config,
        }
    }
}

/// WebSocket upgrade handler.
///
/// Identity is established afterwards by the `authenticate` event, so the
/// upgrade itself is only gated by connection limits.
pub async fn handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let (outbox, inbox) = mpsc::channel::<OutboundFrame>(state.config.send_buffer_size);

    // Register connection (enforces connection limits)
    let connection_id = state.broker.connect(outbox.clone()).await.map_err(|e| {
        warn!("Rejected WebSocket upgrade: {e}");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    debug!("Registered connection {connection_id}, upgrading");

    let rate_limiter = state.rate_limiter_factory.create();
    let broker = state.broker.clone();

    Ok(ws
        .on_failed_upgrade(move |e| {
            warn!("WebSocket upgrade failed for {connection_id}: {e}");
            tokio::spawn(async move {
                broker.disconnect(connection_id).await;
            });
        })
        .on_upgrade(move |socket| {
            handle_socket(socket, connection_id, state, rate_limiter, outbox, inbox)
        }))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(
    socket: WebSocket,
    connection_id: ConnectionId,
    state: AppState,
    rate_limiter: ConnectionRateLimiter,
    outbox: mpsc::Sender<OutboundFrame>,
    inbox: mpsc::Receiver<OutboundFrame>,
) {
    let shutdown_guard = state.broker.shutdown_coordinator().subscribe_guard();

    let connection = WebSocketConnection::new(
        connection_id,
        state.broker.clone(),
        state.config,
        rate_limiter,
    );

    match connection.handle(socket, outbox, inbox, shutdown_guard).await {
        Ok(()) => info!("Connection {connection_id} finished"),
        Err(e) => error!("Connection {connection_id} error: {e}"),
    }
}
