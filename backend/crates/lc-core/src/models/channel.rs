use crate::{ChannelId, ChannelType, LeagueId, Message, MessageId, UserId};

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub league_id: LeagueId,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Ordered, duplicate-free.
    pub participants: Vec<UserId>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<MessageId>,
    #[serde(default)]
    pub unread_counts: HashMap<UserId, u32>,
    pub created_at: DateTime<Utc>,
}

impl Channel {
    pub fn new(
        id: ChannelId,
        league_id: LeagueId,
        name: impl Into<String>,
        channel_type: ChannelType,
        participants: impl IntoIterator<Item = UserId>,
    ) -> Self {
        let mut channel = Self {
            id,
            league_id,
            name: name.into(),
            channel_type,
            participants: Vec::new(),
            is_active: true,
            last_message: None,
            unread_counts: HashMap::new(),
            created_at: Utc::now(),
        };

        for participant in participants {
            channel.add_participant(participant);
        }

        channel
    }

    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.participants.contains(user_id)
    }

    /// Returns `false` if the user was already a participant.
    pub fn add_participant(&mut self, user_id: UserId) -> bool {
        if self.is_participant(&user_id) {
            return false;
        }
        self.participants.push(user_id);
        true
    }

    /// Read access. Commissioner channels are readable by every member of
    /// their league; posting there stays limited to the participants.
    pub fn may_read(&self, user_id: &UserId, member_of: &LeagueId) -> bool {
        self.is_participant(user_id)
            || (self.channel_type == ChannelType::Commissioner && self.league_id == *member_of)
    }

    /// Post authorization: participants only, system messages exempt.
    pub fn may_post(&self, sender_id: &UserId) -> bool {
        sender_id.is_system() || self.is_participant(sender_id)
    }

    /// Moves the last-message pointer and bumps unread for every participant
    /// other than the sender. Users in `viewers` currently have the channel
    /// joined on a live connection; they see the message as it arrives, so
    /// their counter stays where their last join left it.
    pub fn record_incoming(&mut self, message: &Message, viewers: &HashSet<UserId>) {
        self.last_message = Some(message.id);

        for participant in &self.participants {
            if *participant != message.sender_id && !viewers.contains(participant) {
                *self.unread_counts.entry(participant.clone()).or_insert(0) += 1;
            }
        }
    }

    /// Readers who are not participants have no counter to reset.
    pub fn reset_unread(&mut self, user_id: &UserId) {
        if self.is_participant(user_id) {
            self.unread_counts.insert(user_id.clone(), 0);
        }
    }

    pub fn unread_for(&self, user_id: &UserId) -> u32 {
        self.unread_counts.get(user_id).copied().unwrap_or(0)
    }

    /// Copy of the channel as `user_id` may see it: only their own unread counter.
    pub fn view_for(&self, user_id: &UserId) -> Self {
        let mut view = self.clone();
        view.unread_counts.retain(|user, _| user == user_id);
        view
    }

    pub fn archive(&mut self) {
        self.is_active = false;
    }
}
