use crate::{BrokerError, MessageLog, Result as BrokerErrorResult};

use lc_core::{Channel, LeagueId, Message, MessageDraft, MessageIdGenerator, UserId};

use std::collections::HashSet;

use tokio::sync::{Mutex, MutexGuard};

/// One channel: metadata, unread counters and message log behind a single lock.
///
/// Holding the lock across "append, then enqueue for fan-out" is what keeps
/// per-channel delivery order equal to append order.
pub struct ChannelSlot {
    state: Mutex<ChannelState>,
}

impl ChannelSlot {
    pub fn new(channel: Channel) -> Self {
        Self {
            state: Mutex::new(ChannelState {
                channel,
                log: MessageLog::new(),
            }),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().await
    }
}

#[derive(Debug)]
pub struct ChannelState {
    pub channel: Channel,
    pub log: MessageLog,
}

impl ChannelState {
    #[track_caller]
    pub fn ensure_active(&self) -> BrokerErrorResult<()> {
        if !self.channel.is_active {
            return Err(BrokerError::invalid_state(format!(
                "channel {} is archived",
                self.channel.id
            )));
        }
        Ok(())
    }

    #[track_caller]
    pub fn ensure_may_post(&self, user_id: &UserId) -> BrokerErrorResult<()> {
        if !self.channel.may_post(user_id) {
            return Err(BrokerError::denied(format!(
                "{user_id} is not a participant of {}",
                self.channel.id
            )));
        }
        Ok(())
    }

    /// Read access check plus unread reset; subscribing the transport is the caller's part.
    #[track_caller]
    pub fn join(&mut self, user_id: &UserId, member_of: &LeagueId) -> BrokerErrorResult<()> {
        if !self.channel.may_read(user_id, member_of) {
            return Err(BrokerError::denied(format!(
                "{user_id} may not join {}",
                self.channel.id
            )));
        }
        self.channel.reset_unread(user_id);
        Ok(())
    }

    /// Validates and appends a message, then updates the last-message pointer and
    /// unread counters. `viewers` are users currently joined on a live connection.
    #[track_caller]
    pub fn append(
        &mut self,
        ids: &MessageIdGenerator,
        draft: MessageDraft,
        viewers: &HashSet<UserId>,
    ) -> BrokerErrorResult<Message> {
        self.ensure_active()?;
        self.ensure_may_post(&draft.sender_id)?;

        if let Some(reply_to) = draft.reply_to
            && !self.log.contains(reply_to)
        {
            return Err(BrokerError::not_found(format!(
                "reply target {reply_to} not found in {}",
                self.channel.id
            )));
        }

        let message = self
            .log
            .append(
                ids,
                self.channel.id.clone(),
                self.channel.league_id.clone(),
                draft,
            )
            .clone();
        self.channel.record_incoming(&message, viewers);

        Ok(message)
    }

    pub fn history(&self, limit: usize) -> Vec<Message> {
        self.log.recent(limit).cloned().collect()
    }
}
