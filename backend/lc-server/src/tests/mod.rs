
use crate::build_router;

use lc_broker::{AppState, Broker, RateLimiterFactory};
use lc_config::{BrokerConfig, RateLimitConfig, WebSocketConfig};

use axum_test::TestServer;

fn create_test_server() -> (TestServer, Broker) {
    let broker = Broker::with_config(BrokerConfig::default());
    let state = AppState::new(
        broker.clone(),
        RateLimiterFactory::new(RateLimitConfig::default()),
        WebSocketConfig::default(),
    );
    let server = TestServer::new(build_router(state, None)).expect("Failed to create test server");
    (server, broker)
}
