use crate::{HandlerContext, Result as BrokerErrorResult};

use lc_core::ChannelId;

pub async fn handle_typing_start(
    channel_id: ChannelId,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    ctx.broker
        .start_typing(ctx.connection_id, &channel_id)
        .await
}

pub async fn handle_typing_stop(
    channel_id: ChannelId,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    ctx.broker
        .stop_typing(ctx.connection_id, &channel_id)
        .await?;
    Ok(())
}
