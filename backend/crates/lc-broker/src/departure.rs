use crate::{ConnectionId, Identity};

use lc_core::ChannelId;

use std::collections::HashSet;

/// What the registry knew about a connection at the moment it was removed.
#[derive(Debug, Clone)]
pub struct Departure {
    pub connection_id: ConnectionId,
    pub identity: Option<Identity>,
    /// True only when this was the user's last live connection for the league.
    pub went_offline: bool,
    pub joined_channels: HashSet<ChannelId>,
}
