use crate::{ConnectionId, Identity};

use lc_core::ChannelId;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

/// Information about an active connection
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    /// Unset until the connection authenticates
    pub identity: Option<Identity>,
    pub connected_at: DateTime<Utc>,
    pub joined_channels: HashSet<ChannelId>,
}

impl ConnectionInfo {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            identity: None,
            connected_at: Utc::now(),
            joined_channels: HashSet::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
