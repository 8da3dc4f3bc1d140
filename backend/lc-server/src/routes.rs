use crate::{admin, health};

use lc_broker::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints.
///
/// `/metrics` is only mounted when a Prometheus recorder was installed.
pub fn build_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        // WebSocket endpoint
        .route("/ws", get(lc_broker::handler))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Admin endpoints
        .route("/admin/shutdown", post(admin::shutdown_handler))
        .route(
            "/admin/channels/{channel_id}/archive",
            post(admin::archive_channel_handler),
        )
        .route(
            "/admin/channels/{channel_id}/system-message",
            post(admin::system_message_handler),
        )
        .route(
            "/admin/leagues/{league_id}/commissioner-channel",
            post(admin::create_commissioner_channel_handler),
        )
        .with_state(state);

    if let Some(handle) = metrics {
        router = router.route("/metrics", get(move || std::future::ready(handle.render())));
    }

    // CORS middleware (allow all origins for WebSocket)
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
