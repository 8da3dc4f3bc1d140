use crate::handlers::channel::{
    handle_archive_channel, handle_create_trade_channel, handle_join_channel,
};
use crate::handlers::connection::handle_authenticate;
use crate::handlers::error_boundary::with_error_boundary;
use crate::handlers::error_codes;
use crate::handlers::message::{handle_edit_message, handle_send_message};
use crate::handlers::reaction::{handle_add_reaction, handle_remove_reaction};
use crate::handlers::typing::{handle_typing_start, handle_typing_stop};
use crate::{
    ClientEvent, HandlerContext, MetricsTimer, Result as BrokerErrorResult, ServerEvent,
    log_handler_entry, log_handler_exit,
};

use std::time::Duration;

use log::{error, warn};

const HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatch a client event to its handler.
/// Includes:
/// - Correlation ID tracking
/// - Structured logging
/// - Timeout protection
/// - Panic isolation
///
/// Successful handlers reply and broadcast through the broker themselves; the
/// return value is the `error` event owed to the originating connection, if any.
pub async fn dispatch(event: ClientEvent, ctx: HandlerContext) -> Option<ServerEvent> {
    let handler_name = event.name();
    let metrics = ctx.broker.metrics().clone();
    let request_ctx = ctx.request_ctx.clone();

    metrics.event_received(handler_name);
    let timer = MetricsTimer::new(metrics.clone());
    log_handler_entry!(request_ctx, handler_name);

    let outcome = tokio::time::timeout(
        HANDLER_TIMEOUT,
        with_error_boundary(&request_ctx, handler_name, move || {
            dispatch_inner(event, ctx)
        }),
    )
    .await;
    timer.finish();

    let Ok(result) = outcome else {
        error!(
            "{} Handler {handler_name} timed out after {}s",
            request_ctx.log_prefix(),
            HANDLER_TIMEOUT.as_secs()
        );
        metrics.error_occurred(error_codes::TIMEOUT);
        return Some(ServerEvent::Error {
            code: error_codes::TIMEOUT.to_string(),
            message: "Request timed out. Please try again.".to_string(),
        });
    };

    log_handler_exit!(request_ctx, handler_name, result);

    match result {
        Ok(()) => None,
        Err(e) => {
            let reply = e.to_event();
            warn!(
                "{} Handler {handler_name} failed with {}",
                request_ctx.log_prefix(),
                e.error_code()
            );
            metrics.error_occurred(e.error_code());
            Some(reply)
        }
    }
}

async fn dispatch_inner(event: ClientEvent, ctx: HandlerContext) -> BrokerErrorResult<()> {
    match event {
        ClientEvent::Authenticate {
            user_id,
            username,
            league_id,
        } => handle_authenticate(user_id, username, league_id, ctx).await,
        ClientEvent::JoinChannel { channel_id } => handle_join_channel(channel_id, ctx).await,
        ClientEvent::SendMessage(request) => handle_send_message(request, ctx).await,
        ClientEvent::EditMessage {
            message_id,
            new_message,
        } => handle_edit_message(message_id, new_message, ctx).await,
        ClientEvent::AddReaction { message_id, emoji } => {
            handle_add_reaction(message_id, emoji, ctx).await
        }
        ClientEvent::RemoveReaction { message_id, emoji } => {
            handle_remove_reaction(message_id, emoji, ctx).await
        }
        ClientEvent::TypingStart { channel_id } => handle_typing_start(channel_id, ctx).await,
        ClientEvent::TypingStop { channel_id } => handle_typing_stop(channel_id, ctx).await,
        ClientEvent::CreateTradeChannel {
            participant_ids,
            trade_name,
        } => handle_create_trade_channel(participant_ids, trade_name, ctx).await,
        ClientEvent::ArchiveChannel { channel_id } => {
            handle_archive_channel(channel_id, ctx).await
        }
    }
}
