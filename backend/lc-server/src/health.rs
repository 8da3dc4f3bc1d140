use lc_broker::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - component status with live connection and channel counts
pub async fn health_check(State(state): State<AppState>) -> Response {
    let shutting_down = state.broker.shutdown_coordinator().is_shutdown();

    let health = json!({
        "status": if shutting_down { "shutting_down" } else { "healthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "connections": state.broker.connection_count().await,
        "channels": state.broker.channel_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - not ready once shutdown has begun
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    if state.broker.shutdown_coordinator().is_shutdown() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }
    (StatusCode::OK, "Ready").into_response()
}
