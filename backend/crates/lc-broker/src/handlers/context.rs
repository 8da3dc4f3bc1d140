use crate::{Broker, ConnectionId, RequestContext};

use lc_core::UserId;

/// Context passed to all handlers: who sent the event and the broker to act on.
#[derive(Clone)]
pub struct HandlerContext {
    pub connection_id: ConnectionId,
    pub broker: Broker,
    /// Request context for tracing
    pub request_ctx: RequestContext,
}

impl HandlerContext {
    pub fn new(connection_id: ConnectionId, user_id: Option<UserId>, broker: Broker) -> Self {
        Self {
            connection_id,
            broker,
            request_ctx: RequestContext::new(connection_id, user_id),
        }
    }

    /// Get log prefix for structured logging
    pub fn log_prefix(&self) -> String {
        self.request_ctx.log_prefix()
    }
}

impl std::fmt::Debug for HandlerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerContext")
            .field("connection_id", &self.connection_id)
            .field("user_id", &self.request_ctx.user_id)
            .field("correlation_id", &self.request_ctx.correlation_id)
            .finish()
    }
}
