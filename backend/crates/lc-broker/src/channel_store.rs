use crate::{BrokerError, ChannelSlot, Result as BrokerErrorResult};

use lc_core::{Channel, ChannelId, ChannelType, LeagueId, MessageId, MessageIdGenerator, UserId};

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::RwLock;

/// Owns every channel and the index from message id to owning channel.
///
/// The channel map lock is held only to find or insert a slot; all per-channel
/// work happens under that slot's own lock.
#[derive(Clone)]
pub struct ChannelStore {
    channels: Arc<RwLock<HashMap<ChannelId, Arc<ChannelSlot>>>>,
    message_index: Arc<RwLock<HashMap<MessageId, ChannelId>>>,
    ids: Arc<MessageIdGenerator>,
}

impl ChannelStore {
    pub fn new(ids: Arc<MessageIdGenerator>) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            message_index: Arc::new(RwLock::new(HashMap::new())),
            ids,
        }
    }

    pub fn ids(&self) -> &MessageIdGenerator {
        &self.ids
    }

    /// League channels exist once per league; a repeat call returns the existing one.
    pub async fn create_league_channel(&self, league_id: &LeagueId) -> Channel {
        let id = ChannelId::league(league_id);
        let mut channels = self.channels.write().await;

        if let Some(slot) = channels.get(&id) {
            let slot = Arc::clone(slot);
            drop(channels);
            return slot.lock().await.channel.clone();
        }

        let channel = Channel::new(
            id.clone(),
            league_id.clone(),
            "League Chat",
            ChannelType::League,
            std::iter::empty(),
        );
        channels.insert(id, Arc::new(ChannelSlot::new(channel.clone())));
        info!("Created league channel for {league_id}");
        channel
    }

    /// Only the commissioner posts; league members read (see `Channel::may_read`).
    pub async fn create_commissioner_channel(
        &self,
        league_id: &LeagueId,
        commissioner_id: UserId,
    ) -> BrokerErrorResult<Channel> {
        let channel = Channel::new(
            ChannelId::commissioner(league_id),
            league_id.clone(),
            "Commissioner Announcements",
            ChannelType::Commissioner,
            [commissioner_id],
        );
        self.insert_new(channel).await
    }

    /// Participants must already be deduplicated and validated by the caller.
    pub async fn create_trade_channel(
        &self,
        league_id: &LeagueId,
        participant_ids: Vec<UserId>,
        name: &str,
    ) -> BrokerErrorResult<Channel> {
        let channel = Channel::new(
            ChannelId::trade(self.ids.next_id()),
            league_id.clone(),
            name,
            ChannelType::Trade,
            participant_ids,
        );
        self.insert_new(channel).await
    }

    pub async fn create_team_channel(
        &self,
        league_id: &LeagueId,
        team_id: &str,
        member_ids: Vec<UserId>,
        name: &str,
    ) -> BrokerErrorResult<Channel> {
        let channel = Channel::new(
            ChannelId::team(league_id, team_id),
            league_id.clone(),
            name,
            ChannelType::Team,
            member_ids,
        );
        self.insert_new(channel).await
    }

    async fn insert_new(&self, channel: Channel) -> BrokerErrorResult<Channel> {
        let mut channels = self.channels.write().await;
        if channels.contains_key(&channel.id) {
            return Err(BrokerError::invalid_state(format!(
                "channel {} already exists",
                channel.id
            )));
        }

        info!(
            "Created {} channel {} with {} participants",
            channel.channel_type.as_str(),
            channel.id,
            channel.participants.len()
        );
        channels.insert(channel.id.clone(), Arc::new(ChannelSlot::new(channel.clone())));
        Ok(channel)
    }

    pub async fn slot(&self, channel_id: &ChannelId) -> BrokerErrorResult<Arc<ChannelSlot>> {
        let channels = self.channels.read().await;
        channels
            .get(channel_id)
            .cloned()
            .ok_or_else(|| BrokerError::not_found(format!("channel {channel_id} not found")))
    }

    pub async fn get(&self, channel_id: &ChannelId) -> Option<Channel> {
        let slot = self.slot(channel_id).await.ok()?;
        let state = slot.lock().await;
        Some(state.channel.clone())
    }

    /// Idempotent; returns `true` if the user was newly added.
    pub async fn add_participant(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> BrokerErrorResult<bool> {
        let slot = self.slot(channel_id).await?;
        let mut state = slot.lock().await;
        let added = state.channel.add_participant(user_id.clone());
        if added {
            debug!("Added {user_id} to {channel_id}");
        }
        Ok(added)
    }

    /// Channels of a league ordered by type, then creation time.
    ///
    /// Each slot is locked on its own, so the snapshot is per-channel consistent only.
    pub async fn channels_for_league(&self, league_id: &LeagueId) -> Vec<Channel> {
        let mut result = Vec::new();
        for slot in self.slots().await {
            let state = slot.lock().await;
            if state.channel.league_id == *league_id {
                result.push(state.channel.clone());
            }
        }
        result.sort_by(|a, b| {
            type_rank(a.channel_type)
                .cmp(&type_rank(b.channel_type))
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        result
    }

    /// Marks a trade or team channel read-only. Returns `false` if it already was.
    pub async fn archive(&self, channel_id: &ChannelId) -> BrokerErrorResult<bool> {
        let slot = self.slot(channel_id).await?;
        let mut state = slot.lock().await;

        if state.channel.channel_type.is_long_lived() {
            return Err(BrokerError::invalid_state(format!(
                "{} channels cannot be archived",
                state.channel.channel_type
            )));
        }

        if !state.channel.is_active {
            return Ok(false);
        }

        state.channel.archive();
        info!("Archived channel {channel_id}");
        Ok(true)
    }

    pub async fn unread_count(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> BrokerErrorResult<u32> {
        let slot = self.slot(channel_id).await?;
        let state = slot.lock().await;
        Ok(state.channel.unread_for(user_id))
    }

    /// Channel currently retaining a message.
    pub async fn channel_of(&self, message_id: MessageId) -> BrokerErrorResult<ChannelId> {
        let index = self.message_index.read().await;
        index
            .get(&message_id)
            .cloned()
            .ok_or_else(|| BrokerError::not_found(format!("message {message_id} not found")))
    }

    pub async fn index_message(&self, message_id: MessageId, channel_id: ChannelId) {
        let mut index = self.message_index.write().await;
        index.insert(message_id, channel_id);
    }

    pub async fn forget_messages(&self, message_ids: &[MessageId]) {
        if message_ids.is_empty() {
            return;
        }
        let mut index = self.message_index.write().await;
        for id in message_ids {
            index.remove(id);
        }
    }

    /// Snapshot of every slot, so callers can visit channels without holding the map lock.
    pub async fn slots(&self) -> Vec<Arc<ChannelSlot>> {
        let channels = self.channels.read().await;
        channels.values().cloned().collect()
    }

    pub async fn channel_count(&self) -> usize {
        let channels = self.channels.read().await;
        channels.len()
    }

    pub async fn indexed_message_count(&self) -> usize {
        let index = self.message_index.read().await;
        index.len()
    }
}

fn type_rank(channel_type: ChannelType) -> u8 {
    match channel_type {
        ChannelType::League => 0,
        ChannelType::Commissioner => 1,
        ChannelType::Team => 2,
        ChannelType::Trade => 3,
    }
}
