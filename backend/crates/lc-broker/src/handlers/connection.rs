use crate::{HandlerContext, Result as BrokerErrorResult};

use lc_core::{LeagueId, UserId};

use log::debug;

/// Handle `authenticate`
///
/// Binds the identity to this connection; the broker replies with `channels`
/// and tells the league the user came online.
pub async fn handle_authenticate(
    user_id: UserId,
    username: String,
    league_id: LeagueId,
    ctx: HandlerContext,
) -> BrokerErrorResult<()> {
    debug!("{} Authenticate as {user_id} in {league_id}", ctx.log_prefix());

    let channels = ctx
        .broker
        .authenticate(ctx.connection_id, user_id, &username, league_id)
        .await?;

    debug!(
        "{} Authenticated, {} channels visible",
        ctx.log_prefix(),
        channels.len()
    );
    Ok(())
}
