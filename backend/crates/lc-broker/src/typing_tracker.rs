use crate::ConnectionId;

use lc_core::{ChannelId, TypingIndicator, UserId};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Ephemeral "user X is typing in channel Y" facts.
///
/// Expiry runs on the tokio clock so paused-time tests can drive it.
#[derive(Clone, Default)]
pub struct TypingTracker {
    inner: Arc<Mutex<HashMap<(ChannelId, UserId), TypingEntry>>>,
}

struct TypingEntry {
    indicator: TypingIndicator,
    /// Connection whose `typing-start` created or last refreshed the indicator
    connection_id: ConnectionId,
    started: Instant,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or refreshes an indicator. Returns `true` if it is new.
    pub async fn start(
        &self,
        connection_id: ConnectionId,
        channel_id: ChannelId,
        user_id: UserId,
        username: &str,
    ) -> bool {
        let mut inner = self.inner.lock().await;
        let entry = TypingEntry {
            indicator: TypingIndicator::new(channel_id.clone(), user_id.clone(), username),
            connection_id,
            started: Instant::now(),
        };
        inner.insert((channel_id, user_id), entry).is_none()
    }

    pub async fn stop(&self, channel_id: &ChannelId, user_id: &UserId) -> Option<TypingIndicator> {
        let mut inner = self.inner.lock().await;
        inner
            .remove(&(channel_id.clone(), user_id.clone()))
            .map(|entry| entry.indicator)
    }

    /// Removes and returns every indicator older than `ttl`.
    pub async fn expire(&self, ttl: Duration) -> Vec<TypingIndicator> {
        let now = Instant::now();
        let mut inner = self.inner.lock().await;
        let mut expired = Vec::new();
        inner.retain(|_, entry| {
            if now.duration_since(entry.started) >= ttl {
                expired.push(entry.indicator.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// Removes every indicator owned by a connection that went away.
    pub async fn clear_connection(&self, connection_id: ConnectionId) -> Vec<TypingIndicator> {
        let mut inner = self.inner.lock().await;
        let mut cleared = Vec::new();
        inner.retain(|_, entry| {
            if entry.connection_id == connection_id {
                cleared.push(entry.indicator.clone());
                false
            } else {
                true
            }
        });
        cleared
    }

    pub async fn is_typing(&self, channel_id: &ChannelId, user_id: &UserId) -> bool {
        let inner = self.inner.lock().await;
        inner.contains_key(&(channel_id.clone(), user_id.clone()))
    }

    /// Current typists in a channel, ordered by user id.
    pub async fn typing_in(&self, channel_id: &ChannelId) -> Vec<TypingIndicator> {
        let inner = self.inner.lock().await;
        let mut typing: Vec<TypingIndicator> = inner
            .iter()
            .filter(|((channel, _), _)| channel == channel_id)
            .map(|(_, entry)| entry.indicator.clone())
            .collect();
        typing.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        typing
    }

    pub async fn count(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.len()
    }
}
