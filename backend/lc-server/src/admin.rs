//! Administrative endpoints for the league backend that fronts the broker.
//!
//! These trust their caller the same way `authenticate` does; put them
//! behind the private network or a gateway.

use crate::ApiResult;

use lc_broker::AppState;
use lc_core::{Channel, ChannelId, LeagueId, Message, UserId};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMessageRequest {
    pub message: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionerChannelRequest {
    pub commissioner_id: UserId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    pub channel_id: ChannelId,
    /// False if the channel was already archived
    pub archived: bool,
}

/// POST /admin/shutdown
///
/// Returns immediately; clients get `server-shutdown` and the listener drains.
pub async fn shutdown_handler(State(state): State<AppState>) -> StatusCode {
    info!("Graceful shutdown requested via HTTP");

    let broker = state.broker.clone();
    tokio::spawn(async move {
        broker.shutdown("server is shutting down").await;
    });

    StatusCode::ACCEPTED
}

/// POST /admin/channels/{channelId}/archive
pub async fn archive_channel_handler(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<ArchiveResponse>> {
    let channel_id = ChannelId::from(channel_id);
    let archived = state.broker.archive_channel(&channel_id).await?;

    info!("Admin archive of {channel_id} (changed: {archived})");
    Ok(Json(ArchiveResponse {
        channel_id,
        archived,
    }))
}

/// POST /admin/channels/{channelId}/system-message
pub async fn system_message_handler(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(request): Json<SystemMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let channel_id = ChannelId::from(channel_id);
    let message = state
        .broker
        .send_system_message(&channel_id, &request.message, request.metadata)
        .await?;

    info!("System message {} posted to {channel_id}", message.id);
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /admin/leagues/{leagueId}/commissioner-channel
pub async fn create_commissioner_channel_handler(
    State(state): State<AppState>,
    Path(league_id): Path<String>,
    Json(request): Json<CommissionerChannelRequest>,
) -> ApiResult<(StatusCode, Json<Channel>)> {
    let league_id = LeagueId::from(league_id);
    let channel = state
        .broker
        .create_commissioner_channel(&league_id, request.commissioner_id)
        .await?;

    info!("Commissioner channel {} created", channel.id);
    Ok((StatusCode::CREATED, Json(channel)))
}
