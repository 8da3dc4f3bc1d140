use crate::{HandlerContext, Result as BrokerErrorResult};

use lc_core::MessageId;

use log::debug;

/// Handle `add-reaction`. Repeating a reaction is a silent no-op.
pub async fn handle_add_reaction(
    message_id: MessageId,
    emoji: String,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    let changed = ctx
        .broker
        .add_reaction(ctx.connection_id, message_id, &emoji)
        .await?;

    debug!(
        "{} Reaction {emoji} on {message_id} {}",
        ctx.log_prefix(),
        if changed { "added" } else { "already present" }
    );
    Ok(())
}

/// Handle `remove-reaction`
pub async fn handle_remove_reaction(
    message_id: MessageId,
    emoji: String,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    let changed = ctx
        .broker
        .remove_reaction(ctx.connection_id, message_id, &emoji)
        .await?;

    debug!(
        "{} Reaction {emoji} on {message_id} {}",
        ctx.log_prefix(),
        if changed { "removed" } else { "not present" }
    );
    Ok(())
}
