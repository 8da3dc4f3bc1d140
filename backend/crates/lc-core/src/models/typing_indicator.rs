use crate::{ChannelId, UserId};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypingIndicator {
    pub user_id: UserId,
    pub username: String,
    pub channel_id: ChannelId,
    pub started_at: DateTime<Utc>,
}

impl TypingIndicator {
    pub fn new(channel_id: ChannelId, user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            channel_id,
            started_at: Utc::now(),
        }
    }
}
