use crate::Result as BrokerErrorResult;

use lc_core::{ChannelId, Message, UserId};

use async_trait::async_trait;
use log::info;

/// Body characters carried in an offline notification preview.
pub const PREVIEW_CHARS: usize = 100;

/// What the push-notification side receives for one `send-message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineNotice {
    pub participant_user_ids: Vec<UserId>,
    pub channel_id: ChannelId,
    pub message_preview: String,
}

impl OfflineNotice {
    pub fn for_message(message: &Message, participant_user_ids: Vec<UserId>) -> Self {
        Self {
            participant_user_ids,
            channel_id: message.channel_id.clone(),
            message_preview: message.preview(PREVIEW_CHARS),
        }
    }
}

/// Hook into push-notification delivery for participants with no live connection.
///
/// Called off the broadcast path; errors are logged and dropped.
#[async_trait]
pub trait OfflineNotifier: Send + Sync {
    async fn notify(&self, notice: OfflineNotice) -> BrokerErrorResult<()>;
}

/// Default notifier: records the notice in the log.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl OfflineNotifier for LoggingNotifier {
    async fn notify(&self, notice: OfflineNotice) -> BrokerErrorResult<()> {
        info!(
            "Offline notification for {} user(s) in {}: {}",
            notice.participant_user_ids.len(),
            notice.channel_id,
            notice.message_preview
        );
        Ok(())
    }
}
