use crate::{HandlerContext, Result as BrokerErrorResult};

use lc_core::{ChannelId, UserId};

use log::{debug, info};

/// Handle `join-channel`
pub async fn handle_join_channel(
    channel_id: ChannelId,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    let history = ctx
        .broker
        .join_channel(ctx.connection_id, &channel_id)
        .await?;

    debug!(
        "{} Joined {channel_id}, sent {} messages",
        ctx.log_prefix(),
        history.len()
    );
    Ok(())
}

/// Handle `create-trade-channel`
///
/// The sender is always a participant; everyone named is subscribed and
/// receives `trade-channel-created`.
pub async fn handle_create_trade_channel(
    participant_ids: Vec<UserId>,
    trade_name: String,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    let channel = ctx
        .broker
        .create_trade_channel(ctx.connection_id, participant_ids, &trade_name)
        .await?;

    info!("{} Created trade channel {}", ctx.log_prefix(), channel.id);
    Ok(())
}

/// Handle `archive-channel`
pub async fn handle_archive_channel(
    channel_id: ChannelId,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    let archived = ctx
        .broker
        .archive_channel_as(ctx.connection_id, &channel_id)
        .await?;

    if archived {
        info!("{} Archived {channel_id}", ctx.log_prefix());
    } else {
        debug!("{} {channel_id} was already archived", ctx.log_prefix());
    }
    Ok(())
}
