use crate::{BrokerError, Result as BrokerErrorResult};

use lc_core::{ChannelId, LeagueId, Message, MessageDraft, MessageId, MessageIdGenerator, UserId};

use std::collections::VecDeque;

use chrono::Utc;

/// Append-only, size-bounded message sequence for one channel.
///
/// Messages are kept in id order. Ids come from a monotonic generator and
/// appends to one log are serialized by the owning channel's lock, so the
/// back of the deque always holds the newest id and lookups can binary search.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: VecDeque<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        ids: &MessageIdGenerator,
        channel_id: ChannelId,
        league_id: LeagueId,
        draft: MessageDraft,
    ) -> &Message {
        let message = Message::from_draft(ids.next_id(), channel_id, league_id, draft);
        self.messages.push_back(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn get(&self, message_id: MessageId) -> Option<&Message> {
        self.position(message_id).map(|index| &self.messages[index])
    }

    pub fn contains(&self, message_id: MessageId) -> bool {
        self.position(message_id).is_some()
    }

    /// Only the original sender may edit.
    #[track_caller]
    pub fn edit(
        &mut self,
        message_id: MessageId,
        sender_id: &UserId,
        new_body: String,
    ) -> BrokerErrorResult<&Message> {
        let message = self.get_mut(message_id)?;

        if message.sender_id != *sender_id {
            return Err(BrokerError::denied(format!(
                "only the original sender may edit message {message_id}"
            )));
        }

        message.body = new_body;
        message.edited_at = Some(Utc::now());
        Ok(&*message)
    }

    /// Returns whether anything changed; re-adding an existing reaction is a no-op.
    ///
    /// `max_distinct` caps how many different emoji a message can carry. Adding
    /// to an emoji that is already present is always allowed.
    #[track_caller]
    pub fn add_reaction(
        &mut self,
        message_id: MessageId,
        user_id: &UserId,
        emoji: &str,
        max_distinct: usize,
    ) -> BrokerErrorResult<(bool, &Message)> {
        let message = self.get_mut(message_id)?;

        if !message.reactions.contains_emoji(emoji)
            && message.reactions.distinct_emoji() >= max_distinct
        {
            return Err(BrokerError::invalid_state(format!(
                "message {message_id} already has {max_distinct} different reactions"
            )));
        }

        let added = message.reactions.add(user_id, emoji);
        Ok((added, &*message))
    }

    /// Returns whether anything changed; removing an absent reaction is a no-op.
    #[track_caller]
    pub fn remove_reaction(
        &mut self,
        message_id: MessageId,
        user_id: &UserId,
        emoji: &str,
    ) -> BrokerErrorResult<(bool, &Message)> {
        let message = self.get_mut(message_id)?;
        let removed = message.reactions.remove(user_id, emoji);
        Ok((removed, &*message))
    }

    /// The newest `limit` messages, oldest first.
    ///
    /// The returned iterator borrows the log; it is lazy, finite and can be
    /// cloned to walk the same window again.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Message> + Clone + '_ {
        let start = self.messages.len().saturating_sub(limit);
        self.messages.range(start..)
    }

    /// Drops the oldest messages until at most `cap` remain and returns the
    /// dropped ids so callers can forget them.
    pub fn truncate_to(&mut self, cap: usize) -> Vec<MessageId> {
        let excess = self.messages.len().saturating_sub(cap);
        self.messages.drain(..excess).map(|m| m.id).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn latest(&self) -> Option<&Message> {
        self.messages.back()
    }

    fn position(&self, message_id: MessageId) -> Option<usize> {
        self.messages
            .binary_search_by_key(&message_id, |m| m.id)
            .ok()
    }

    #[track_caller]
    fn get_mut(&mut self, message_id: MessageId) -> BrokerErrorResult<&mut Message> {
        match self.position(message_id) {
            Some(index) => Ok(&mut self.messages[index]),
            None => Err(BrokerError::not_found(format!(
                "message {message_id} not found"
            ))),
        }
    }
}
