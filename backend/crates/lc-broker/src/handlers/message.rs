use crate::{HandlerContext, Result as BrokerErrorResult, SendMessage};

use lc_core::MessageId;

use log::debug;

/// Handle `send-message`
///
/// The sender sees its own message through the `new-message` broadcast; there
/// is no separate acknowledgement.
pub async fn handle_send_message(
    request: SendMessage,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    let message = ctx
        .broker
        .send_message(ctx.connection_id, request)
        .await?;

    debug!(
        "{} Message {} appended to {}",
        ctx.log_prefix(),
        message.id,
        message.channel_id
    );
    Ok(())
}

/// Handle `edit-message`
pub async fn handle_edit_message(
    message_id: MessageId,
    new_message: String,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    ctx.broker
        .edit_message(ctx.connection_id, message_id, &new_message)
        .await?;

    debug!("{} Message {message_id} edited", ctx.log_prefix());
    Ok(())
}
