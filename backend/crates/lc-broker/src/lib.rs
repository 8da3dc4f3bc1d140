pub mod app_state;
pub mod broker;
pub mod channel_slot;
pub mod channel_store;
pub mod connection_id;
pub mod connection_info;
pub mod connection_limits;
pub mod connection_registry;
pub mod departure;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod handlers;
pub mod identity;
pub mod janitor;
pub mod message_log;
pub mod message_validator;
pub mod metrics;
pub mod metrics_timer;
pub mod notifier;
pub mod outbound_frame;
pub mod rate_limiter;
pub mod request_context;
pub mod request_logging;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod typing_tracker;
pub mod web_socket_connection;

pub use app_state::{AppState, handler};
pub use broker::Broker;
pub use channel_slot::{ChannelSlot, ChannelState};
pub use channel_store::ChannelStore;
pub use connection_id::ConnectionId;
pub use connection_info::ConnectionInfo;
pub use connection_limits::ConnectionLimits;
pub use connection_registry::ConnectionRegistry;
pub use departure::Departure;
pub use dispatcher::FanoutDispatcher;
pub use error::{BrokerError, Result};
pub use events::{ClientEvent, SendMessage, ServerEvent};
pub use handlers::context::HandlerContext;
pub use handlers::dispatcher::dispatch;
pub use handlers::error_codes::{
    CONNECTION_LIMIT, DENIED, INTERNAL_ERROR, INVALID_MESSAGE, INVALID_STATE, NOT_FOUND,
    RATE_LIMITED, SLOW_CLIENT, TIMEOUT, UNAUTHENTICATED,
};
pub use identity::Identity;
pub use janitor::Janitor;
pub use message_log::MessageLog;
pub use message_validator::MessageValidator;
pub use metrics::Metrics;
pub use metrics_timer::MetricsTimer;
pub use notifier::{LoggingNotifier, OfflineNotice, OfflineNotifier};
pub use outbound_frame::OutboundFrame;
pub use rate_limiter::{ConnectionRateLimiter, RateLimiterFactory};
pub use request_context::RequestContext;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use typing_tracker::TypingTracker;
pub use web_socket_connection::{MAX_VIOLATIONS, WebSocketConnection};

#[cfg(test)]
mod tests;
