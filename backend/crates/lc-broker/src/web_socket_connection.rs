use crate::{
    Broker, BrokerError, ClientEvent, ConnectionId, ConnectionRateLimiter, HandlerContext,
    Metrics, OutboundFrame, Result as BrokerErrorResult, ServerEvent, ShutdownGuard, dispatch,
};

use lc_config::WebSocketConfig;

use std::panic::Location;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{Instant, MissedTickBehavior};

/// Rate limit violations tolerated before the connection is closed
pub const MAX_VIOLATIONS: u32 = 5;

/// Manages a single WebSocket connection
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    broker: Broker,
    config: WebSocketConfig,
    metrics: Metrics,
    rate_limiter: ConnectionRateLimiter,
    violations: u32,
    last_seen: Instant,
}

impl WebSocketConnection {
    pub fn new(
        connection_id: ConnectionId,
        broker: Broker,
        config: WebSocketConfig,
        rate_limiter: ConnectionRateLimiter,
    ) -> Self {
        let metrics = broker.metrics().clone();
        Self {
            connection_id,
            broker,
            config,
            metrics,
            rate_limiter,
            violations: 0,
            last_seen: Instant::now(),
        }
    }

    /// Handle the WebSocket connection lifecycle.
    ///
    /// `outbox`/`inbox` are the two ends of the bounded queue already attached
    /// to the broker's dispatcher. The connection is removed from the broker
    /// before this returns.
    pub async fn handle(
        mut self,
        socket: WebSocket,
        outbox: mpsc::Sender<OutboundFrame>,
        mut inbox: mpsc::Receiver<OutboundFrame>,
        mut shutdown_guard: ShutdownGuard,
    ) -> BrokerErrorResult<()> {
        log::info!("WebSocket connection {} established", self.connection_id);
        self.metrics.connection_established();

        let (mut ws_sender, mut ws_receiver) = socket.split();
        let connection_id = self.connection_id;

        // Serialization and socket writes happen here, never on a broadcasting task.
        let send_task = tokio::spawn(async move {
            while let Some(frame) = inbox.recv().await {
                let message = match frame {
                    OutboundFrame::Event(event) => match serde_json::to_string(&*event) {
                        Ok(json) => Message::Text(Utf8Bytes::from(json)),
                        Err(e) => {
                            log::error!(
                                "Failed to serialize {} for {connection_id}: {e}",
                                event.name()
                            );
                            continue;
                        }
                    },
                    OutboundFrame::Ping => Message::Ping(Bytes::new()),
                    OutboundFrame::Pong(data) => Message::Pong(data),
                };
                if ws_sender.send(message).await.is_err() {
                    break;
                }
            }
            let _ = ws_sender.send(Message::Close(None)).await;
        });

        let heartbeat_period = Duration::from_secs(self.config.heartbeat_interval_secs);
        let heartbeat_timeout = Duration::from_secs(self.config.heartbeat_timeout_secs);
        let mut heartbeat =
            tokio::time::interval_at(Instant::now() + heartbeat_period, heartbeat_period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let result = loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            self.last_seen = Instant::now();
                            match self.handle_client_message(msg, &outbox).await {
                                Ok(true) => {}
                                Ok(false) => {
                                    log::info!("Received close frame from connection {}", self.connection_id);
                                    break Ok(());
                                }
                                Err(e) => {
                                    log::warn!("Closing connection {}: {e}", self.connection_id);
                                    break Err(e);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            log::error!("WebSocket error on connection {}: {e}", self.connection_id);
                            break Err(BrokerError::ConnectionClosed {
                                reason: format!("WebSocket error: {e}"),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            log::info!("Connection {} closed by client", self.connection_id);
                            break Ok(());
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    if self.last_seen.elapsed() >= heartbeat_timeout {
                        log::warn!(
                            "Connection {} silent for {}s, closing",
                            self.connection_id,
                            heartbeat_timeout.as_secs()
                        );
                        break Err(BrokerError::HeartbeatTimeout {
                            timeout_secs: heartbeat_timeout.as_secs(),
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    if let Err(TrySendError::Full(_)) = outbox.try_send(OutboundFrame::Ping) {
                        log::debug!("Skipped ping for {}: queue full", self.connection_id);
                    }
                }

                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down connection {} gracefully", self.connection_id);
                    break Ok(());
                }
            }
        };

        // Cleanup: once the dispatcher and our own sender are gone the send
        // task drains what is queued and closes the socket.
        self.broker.disconnect(self.connection_id).await;
        drop(outbox);
        let _ = send_task.await;

        let reason = match &result {
            Ok(()) => "normal",
            Err(BrokerError::HeartbeatTimeout { .. }) => "heartbeat_timeout",
            Err(BrokerError::RateLimited { .. }) => "rate_limited",
            Err(_) => "error",
        };
        self.metrics.connection_closed(reason);
        log::info!(
            "WebSocket connection {} closed ({reason})",
            self.connection_id
        );

        result
    }

    /// Returns `Ok(false)` when the client asked to close.
    async fn handle_client_message(
        &mut self,
        msg: Message,
        outbox: &mpsc::Sender<OutboundFrame>,
    ) -> BrokerErrorResult<bool> {
        match msg {
            Message::Text(text) => {
                if self.check_rate_limit(outbox)? {
                    self.handle_text_message(text.as_str(), outbox).await;
                }
                Ok(true)
            }
            Message::Binary(data) => {
                if !self.check_rate_limit(outbox)? {
                    return Ok(true);
                }
                log::debug!(
                    "Rejected binary frame ({} bytes) from connection {}",
                    data.len(),
                    self.connection_id
                );
                self.reply(
                    outbox,
                    BrokerError::invalid_message("binary frames are not supported").to_event(),
                );
                Ok(true)
            }
            Message::Ping(data) => {
                if outbox.try_send(OutboundFrame::Pong(data)).is_err() {
                    log::debug!("Dropped pong for {}", self.connection_id);
                }
                Ok(true)
            }
            Message::Pong(_) => Ok(true),
            Message::Close(_) => Ok(false),
        }
    }

    /// Returns `Ok(false)` when the frame must be dropped. A violation is
    /// answered with `RATE_LIMITED`; too many of them end the connection.
    fn check_rate_limit(
        &mut self,
        outbox: &mpsc::Sender<OutboundFrame>,
    ) -> BrokerErrorResult<bool> {
        let Err(e) = self.rate_limiter.check() else {
            return Ok(true);
        };

        self.violations += 1;
        self.metrics.error_occurred(e.error_code());
        log::warn!(
            "Rate limit exceeded for connection {} ({}/{MAX_VIOLATIONS} violations)",
            self.connection_id,
            self.violations
        );

        self.reply(outbox, e.to_event());
        if self.violations >= MAX_VIOLATIONS {
            return Err(e);
        }
        Ok(false)
    }

    async fn handle_text_message(&mut self, text: &str, outbox: &mpsc::Sender<OutboundFrame>) {
        if text.len() > self.config.max_frame_bytes {
            self.reply(
                outbox,
                BrokerError::invalid_message(format!(
                    "frame exceeds {} bytes",
                    self.config.max_frame_bytes
                ))
                .to_event(),
            );
            return;
        }

        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                log::debug!("Malformed event from {}: {e}", self.connection_id);
                self.reply(
                    outbox,
                    BrokerError::invalid_message(format!("malformed event: {e}")).to_event(),
                );
                return;
            }
        };

        let user_id = self
            .broker
            .identity(self.connection_id)
            .await
            .map(|identity| identity.user_id);
        let ctx = HandlerContext::new(self.connection_id, user_id, self.broker.clone());

        if let Some(reply) = dispatch(event, ctx).await {
            self.reply(outbox, reply);
        }
    }

    /// Replies go through the same bounded queue as broadcasts.
    fn reply(&self, outbox: &mpsc::Sender<OutboundFrame>, event: ServerEvent) {
        if let Err(e) = outbox.try_send(OutboundFrame::event(event)) {
            log::warn!("Dropped reply for connection {}: {e}", self.connection_id);
        }
    }
}
