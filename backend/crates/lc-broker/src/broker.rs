use crate::{
    BrokerError, ChannelStore, ConnectionId, ConnectionLimits, ConnectionRegistry, Departure,
    FanoutDispatcher, Identity, Janitor, LoggingNotifier, MessageValidator, Metrics,
    OfflineNotice, OfflineNotifier, OutboundFrame, Result as BrokerErrorResult, SendMessage,
    ServerEvent, ShutdownCoordinator, TypingTracker,
};

use lc_config::BrokerConfig;
use lc_core::{
    Channel, ChannelId, LeagueId, Message, MessageDraft, MessageId, MessageIdGenerator,
    MessageKind, UserId,
};

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};

/// The chat and presence broker.
///
/// Owns every piece of shared state. Constructed once at startup and handed to
/// transport handlers by clone (all fields are shared handles), so tests can
/// build isolated instances.
#[derive(Clone)]
pub struct Broker {
    registry: ConnectionRegistry,
    channels: ChannelStore,
    typing: TypingTracker,
    dispatcher: FanoutDispatcher,
    config: BrokerConfig,
    metrics: Metrics,
    shutdown: ShutdownCoordinator,
    janitor: Arc<Mutex<Option<Janitor>>>,
    /// Held across a presence transition and its league broadcast, so watchers
    /// see `user-online` / `user-offline` in the order the registry applied them.
    /// Taken before the registry and dispatcher locks.
    presence: Arc<Mutex<()>>,
}

impl Broker {
    pub fn new(
        config: BrokerConfig,
        limits: ConnectionLimits,
        notifier: Arc<dyn OfflineNotifier>,
    ) -> Self {
        let metrics = Metrics::new();
        Self {
            registry: ConnectionRegistry::new(limits),
            channels: ChannelStore::new(Arc::new(MessageIdGenerator::new())),
            typing: TypingTracker::new(),
            dispatcher: FanoutDispatcher::new(notifier, metrics.clone()),
            config,
            metrics,
            shutdown: ShutdownCoordinator::new(),
            janitor: Arc::new(Mutex::new(None)),
            presence: Arc::new(Mutex::new(())),
        }
    }

    /// Default limits and the logging notifier.
    pub fn with_config(config: BrokerConfig) -> Self {
        Self::new(config, ConnectionLimits::default(), Arc::new(LoggingNotifier))
    }

    /// Builds the broker and starts its janitor tasks.
    pub async fn start(
        config: BrokerConfig,
        limits: ConnectionLimits,
        notifier: Arc<dyn OfflineNotifier>,
    ) -> Self {
        let broker = Self::new(config, limits, notifier);
        broker.start_janitor().await;
        broker
    }

    /// Idempotent; a no-op once shutdown has begun.
    pub async fn start_janitor(&self) {
        let mut janitor = self.janitor.lock().await;
        if janitor.is_none() && !self.shutdown.is_shutdown() {
            *janitor = Some(Janitor::spawn(self.clone()));
        }
    }

    /// Tells every connection the server is going away, then stops the janitor
    /// and signals all connection tasks to close.
    pub async fn shutdown(&self, reason: &str) {
        let notified = self
            .dispatcher
            .broadcast_all(ServerEvent::ServerShutdown {
                reason: reason.to_string(),
            })
            .await;
        info!("Broker shutting down ({reason}), notified {notified} connections");

        self.shutdown.shutdown();

        let janitor = self.janitor.lock().await.take();
        if let Some(janitor) = janitor {
            janitor.join().await;
        }
    }

    // =========================================================================
    // Connection lifecycle
    // =========================================================================

    /// Registers a transport connection and its outbound queue.
    pub async fn connect(
        &self,
        outbox: mpsc::Sender<OutboundFrame>,
    ) -> BrokerErrorResult<ConnectionId> {
        if self.shutdown.is_shutdown() {
            return Err(BrokerError::invalid_state("broker is shutting down"));
        }

        let connection_id = self.registry.register().await?;
        self.dispatcher.attach(connection_id, outbox).await;
        Ok(connection_id)
    }

    /// Binds an identity, enrolls the user in league chat and replies with `channels`:
    /// the league's channels this user may read, each carrying only their own unread counter.
    pub async fn authenticate(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
        username: &str,
        league_id: LeagueId,
    ) -> BrokerErrorResult<Vec<Channel>> {
        MessageValidator::validate_id(user_id.as_str(), "userId")?;
        MessageValidator::validate_id(league_id.as_str(), "leagueId")?;
        let username = MessageValidator::validate_username(username)?;
        if user_id.is_system() {
            return Err(BrokerError::denied("the system identity is reserved"));
        }

        let identity = Identity::new(user_id.clone(), username.clone(), league_id.clone());
        {
            let _presence = self.presence.lock().await;
            let came_online = self.registry.authenticate(connection_id, identity).await?;
            self.dispatcher.join_league(&league_id, connection_id).await;

            if came_online {
                self.dispatcher
                    .broadcast_league(
                        &league_id,
                        ServerEvent::UserOnline {
                            user_id: user_id.clone(),
                            username,
                            league_id: league_id.clone(),
                        },
                        Some(connection_id),
                    )
                    .await;
            }
        }

        let league_channel = self.channels.create_league_channel(&league_id).await;
        self.channels
            .add_participant(&league_channel.id, &user_id)
            .await?;

        let channels: Vec<Channel> = self
            .channels
            .channels_for_league(&league_id)
            .await
            .iter()
            .filter(|channel| channel.may_read(&user_id, &league_id))
            .map(|channel| channel.view_for(&user_id))
            .collect();
        self.reply(
            connection_id,
            ServerEvent::Channels {
                channels: channels.clone(),
            },
        )
        .await;

        Ok(channels)
    }

    /// Removes a connection, announces `user-offline` if it was the user's last
    /// connection for the league, then clears its typing indicators.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Option<Departure> {
        // Stop routing first so nothing else is queued for this connection.
        self.dispatcher.detach(connection_id).await;

        let departure = {
            let _presence = self.presence.lock().await;
            let departure = self.registry.disconnect(connection_id).await;

            if let Some(Departure {
                identity: Some(identity),
                went_offline: true,
                ..
            }) = &departure
            {
                info!(
                    "{} went offline in league {}",
                    identity.user_id, identity.league_id
                );
                self.dispatcher
                    .broadcast_league(
                        &identity.league_id,
                        ServerEvent::UserOffline {
                            user_id: identity.user_id.clone(),
                            league_id: identity.league_id.clone(),
                        },
                        None,
                    )
                    .await;
            }
            departure
        };

        for indicator in self.typing.clear_connection(connection_id).await {
            self.dispatcher
                .broadcast(
                    &indicator.channel_id,
                    ServerEvent::UserStopTyping {
                        channel_id: indicator.channel_id.clone(),
                        user_id: indicator.user_id,
                    },
                    None,
                )
                .await;
        }

        departure
    }

    // =========================================================================
    // Channels
    // =========================================================================

    /// Checks read access, resets the caller's unread counter, subscribes the
    /// connection and replies with `channel-messages`, all under the channel lock
    /// so no message can slip between the history and the live stream.
    pub async fn join_channel(
        &self,
        connection_id: ConnectionId,
        channel_id: &ChannelId,
    ) -> BrokerErrorResult<Vec<Message>> {
        let identity = self.identity_of(connection_id).await?;
        let slot = self.channels.slot(channel_id).await?;

        let history = {
            let mut state = slot.lock().await;
            state.join(&identity.user_id, &identity.league_id)?;
            self.dispatcher
                .join_room(channel_id, connection_id, identity.user_id.clone())
                .await;

            let history = state.history(self.config.history_limit);
            self.reply(
                connection_id,
                ServerEvent::ChannelMessages {
                    channel_id: channel_id.clone(),
                    messages: history.clone(),
                },
            )
            .await;
            history
        };

        self.registry
            .record_join(connection_id, channel_id.clone())
            .await;
        debug!(
            "{} joined {channel_id} ({} messages of history)",
            identity.user_id,
            history.len()
        );
        Ok(history)
    }

    /// Get-or-create.
    pub async fn create_league_channel(&self, league_id: &LeagueId) -> BrokerErrorResult<Channel> {
        MessageValidator::validate_id(league_id.as_str(), "leagueId")?;
        Ok(self.channels.create_league_channel(league_id).await)
    }

    pub async fn create_commissioner_channel(
        &self,
        league_id: &LeagueId,
        commissioner_id: UserId,
    ) -> BrokerErrorResult<Channel> {
        MessageValidator::validate_id(league_id.as_str(), "leagueId")?;
        MessageValidator::validate_id(commissioner_id.as_str(), "commissionerId")?;
        self.channels
            .create_commissioner_channel(league_id, commissioner_id)
            .await
    }

    /// The creator is always a participant. Every live connection of every
    /// participant in the creator's league is subscribed before `trade-channel-created` goes out, so all
    /// named parties can post immediately without joining.
    pub async fn create_trade_channel(
        &self,
        connection_id: ConnectionId,
        participant_ids: Vec<UserId>,
        trade_name: &str,
    ) -> BrokerErrorResult<Channel> {
        let identity = self.identity_of(connection_id).await?;
        let name = MessageValidator::validate_channel_name(trade_name)?;

        let mut participants = vec![identity.user_id.clone()];
        for participant in participant_ids {
            MessageValidator::validate_id(participant.as_str(), "participantIds")?;
            if participant.is_system() {
                return Err(BrokerError::invalid_field(
                    "participantIds",
                    "the system identity cannot take part in a trade",
                ));
            }
            if !participants.contains(&participant) {
                participants.push(participant);
            }
        }

        if participants.len() < 2 {
            return Err(BrokerError::invalid_field(
                "participantIds",
                "a trade channel needs at least two participants",
            ));
        }
        if participants.len() > self.config.max_trade_participants {
            return Err(BrokerError::invalid_field(
                "participantIds",
                format!(
                    "a trade channel allows at most {} participants",
                    self.config.max_trade_participants
                ),
            ));
        }

        let channel = self
            .channels
            .create_trade_channel(&identity.league_id, participants, &name)
            .await?;
        let slot = self.channels.slot(&channel.id).await?;

        {
            let _state = slot.lock().await;
            for participant in &channel.participants {
                for connection in self
                    .registry
                    .connections_in_league(participant, &identity.league_id)
                    .await
                {
                    self.dispatcher
                        .join_room(&channel.id, connection, participant.clone())
                        .await;
                    self.registry.record_join(connection, channel.id.clone()).await;
                }
            }

            self.dispatcher
                .broadcast(
                    &channel.id,
                    ServerEvent::TradeChannelCreated(channel.clone()),
                    None,
                )
                .await;
        }

        info!(
            "{} created trade channel {} with {} participants",
            identity.user_id,
            channel.id,
            channel.participants.len()
        );
        Ok(channel)
    }

    pub async fn create_team_channel(
        &self,
        league_id: &LeagueId,
        team_id: &str,
        member_ids: Vec<UserId>,
        name: &str,
    ) -> BrokerErrorResult<Channel> {
        MessageValidator::validate_id(league_id.as_str(), "leagueId")?;
        MessageValidator::validate_id(team_id, "teamId")?;
        let name = MessageValidator::validate_channel_name(name)?;
        for member in &member_ids {
            MessageValidator::validate_id(member.as_str(), "memberIds")?;
        }

        self.channels
            .create_team_channel(league_id, team_id, member_ids, &name)
            .await
    }

    pub async fn add_participant(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> BrokerErrorResult<bool> {
        MessageValidator::validate_id(user_id.as_str(), "userId")?;
        self.channels.add_participant(channel_id, user_id).await
    }

    /// Makes a trade or team channel read-only and announces `channel-archived`.
    /// Archiving an already archived channel is a no-op.
    pub async fn archive_channel(&self, channel_id: &ChannelId) -> BrokerErrorResult<bool> {
        let archived = self.channels.archive(channel_id).await?;
        if archived {
            self.dispatcher
                .broadcast(
                    channel_id,
                    ServerEvent::ChannelArchived {
                        channel_id: channel_id.clone(),
                    },
                    None,
                )
                .await;
        }
        Ok(archived)
    }

    /// Client-initiated archive: participants only.
    pub async fn archive_channel_as(
        &self,
        connection_id: ConnectionId,
        channel_id: &ChannelId,
    ) -> BrokerErrorResult<bool> {
        let identity = self.identity_of(connection_id).await?;
        let channel = self
            .channels
            .get(channel_id)
            .await
            .ok_or_else(|| BrokerError::not_found(format!("channel {channel_id} not found")))?;

        if !channel.is_participant(&identity.user_id) {
            return Err(BrokerError::denied(format!(
                "{} is not a participant of {channel_id}",
                identity.user_id
            )));
        }

        self.archive_channel(channel_id).await
    }

    // =========================================================================
    // Messages
    // =========================================================================

    pub async fn send_message(
        &self,
        connection_id: ConnectionId,
        request: SendMessage,
    ) -> BrokerErrorResult<Message> {
        let identity = self.identity_of(connection_id).await?;
        let kind = request.message_type.unwrap_or_default();
        let body = MessageValidator::validate_body(
            &request.message,
            kind,
            request.metadata.as_ref(),
            self.config.max_message_length,
        )?;

        let draft = MessageDraft::text(identity.user_id, identity.username, body)
            .with_kind(kind)
            .with_metadata(request.metadata)
            .with_reply_to(request.reply_to);

        self.post(&request.channel_id, draft).await
    }

    /// Broker-authored announcement; exempt from the participant check.
    pub async fn send_system_message(
        &self,
        channel_id: &ChannelId,
        body: &str,
        metadata: Option<Value>,
    ) -> BrokerErrorResult<Message> {
        let body = MessageValidator::validate_body(
            body,
            MessageKind::Announcement,
            None,
            self.config.max_message_length,
        )?;
        self.post(channel_id, MessageDraft::system(body, metadata))
            .await
    }

    /// Append, index and broadcast under the channel lock, then hand offline
    /// participants to the notifier outside it.
    async fn post(&self, channel_id: &ChannelId, draft: MessageDraft) -> BrokerErrorResult<Message> {
        let slot = self.channels.slot(channel_id).await?;

        let (message, participants, league_id) = {
            let mut state = slot.lock().await;
            // Announcements count as unread for everyone, even users watching live.
            let viewers = if draft.sender_id.is_system() {
                HashSet::new()
            } else {
                self.dispatcher.viewers(channel_id).await
            };
            let message = state.append(self.channels.ids(), draft, &viewers)?;

            self.channels
                .index_message(message.id, channel_id.clone())
                .await;
            self.dispatcher
                .broadcast(channel_id, ServerEvent::NewMessage(message.clone()), None)
                .await;

            (
                message,
                state.channel.participants.clone(),
                state.channel.league_id.clone(),
            )
        };

        let recipients: Vec<UserId> = participants
            .into_iter()
            .filter(|participant| *participant != message.sender_id)
            .collect();
        let offline = self.registry.offline_among(&league_id, &recipients).await;
        self.dispatcher
            .notify_offline(OfflineNotice::for_message(&message, offline));

        Ok(message)
    }

    /// Only the original sender may edit; archived channels are read-only.
    pub async fn edit_message(
        &self,
        connection_id: ConnectionId,
        message_id: MessageId,
        new_body: &str,
    ) -> BrokerErrorResult<Message> {
        let identity = self.identity_of(connection_id).await?;
        let body = MessageValidator::validate_body(
            new_body,
            MessageKind::Text,
            None,
            self.config.max_message_length,
        )?;

        let channel_id = self.channels.channel_of(message_id).await?;
        let slot = self.channels.slot(&channel_id).await?;
        let mut state = slot.lock().await;
        state.ensure_active()?;

        let edited = state.log.edit(message_id, &identity.user_id, body)?.clone();
        self.dispatcher
            .broadcast(&channel_id, ServerEvent::MessageEdited(edited.clone()), None)
            .await;

        Ok(edited)
    }

    /// Returns `false` (and broadcasts nothing) if the user had already reacted.
    pub async fn add_reaction(
        &self,
        connection_id: ConnectionId,
        message_id: MessageId,
        emoji: &str,
    ) -> BrokerErrorResult<bool> {
        self.react(connection_id, message_id, emoji, true).await
    }

    /// Returns `false` (and broadcasts nothing) if the user had not reacted.
    pub async fn remove_reaction(
        &self,
        connection_id: ConnectionId,
        message_id: MessageId,
        emoji: &str,
    ) -> BrokerErrorResult<bool> {
        self.react(connection_id, message_id, emoji, false).await
    }

    async fn react(
        &self,
        connection_id: ConnectionId,
        message_id: MessageId,
        emoji: &str,
        add: bool,
    ) -> BrokerErrorResult<bool> {
        let identity = self.identity_of(connection_id).await?;
        MessageValidator::validate_emoji(emoji)?;

        let channel_id = self.channels.channel_of(message_id).await?;
        let slot = self.channels.slot(&channel_id).await?;
        let mut state = slot.lock().await;
        state.ensure_active()?;
        state.ensure_may_post(&identity.user_id)?;

        let (changed, reactions) = if add {
            let (changed, message) = state.log.add_reaction(
                message_id,
                &identity.user_id,
                emoji,
                self.config.max_reactions_per_message,
            )?;
            (changed, message.reactions.clone())
        } else {
            let (changed, message) =
                state
                    .log
                    .remove_reaction(message_id, &identity.user_id, emoji)?;
            (changed, message.reactions.clone())
        };

        if !changed {
            debug!(
                "Reaction {emoji} by {} on {message_id} unchanged",
                identity.user_id
            );
            return Ok(false);
        }

        let event = if add {
            ServerEvent::ReactionAdded {
                message_id,
                channel_id: channel_id.clone(),
                user_id: identity.user_id,
                emoji: emoji.to_string(),
                reactions,
            }
        } else {
            ServerEvent::ReactionRemoved {
                message_id,
                channel_id: channel_id.clone(),
                user_id: identity.user_id,
                emoji: emoji.to_string(),
                reactions,
            }
        };
        self.dispatcher.broadcast(&channel_id, event, None).await;

        Ok(true)
    }

    // =========================================================================
    // Typing
    // =========================================================================

    /// Inserts or refreshes the caller's indicator and tells everyone else in the channel.
    pub async fn start_typing(
        &self,
        connection_id: ConnectionId,
        channel_id: &ChannelId,
    ) -> BrokerErrorResult<()> {
        let identity = self.identity_of(connection_id).await?;
        let slot = self.channels.slot(channel_id).await?;
        {
            let state = slot.lock().await;
            state.ensure_active()?;
            state.ensure_may_post(&identity.user_id)?;
        }

        self.typing
            .start(
                connection_id,
                channel_id.clone(),
                identity.user_id.clone(),
                &identity.username,
            )
            .await;
        self.dispatcher
            .broadcast(
                channel_id,
                ServerEvent::UserTyping {
                    channel_id: channel_id.clone(),
                    user_id: identity.user_id,
                    username: identity.username,
                },
                Some(connection_id),
            )
            .await;

        Ok(())
    }

    /// No broadcast if the user was not marked typing.
    pub async fn stop_typing(
        &self,
        connection_id: ConnectionId,
        channel_id: &ChannelId,
    ) -> BrokerErrorResult<bool> {
        let identity = self.identity_of(connection_id).await?;

        let Some(indicator) = self.typing.stop(channel_id, &identity.user_id).await else {
            return Ok(false);
        };

        self.dispatcher
            .broadcast(
                channel_id,
                ServerEvent::UserStopTyping {
                    channel_id: indicator.channel_id,
                    user_id: indicator.user_id,
                },
                Some(connection_id),
            )
            .await;

        Ok(true)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn get_channel(&self, channel_id: &ChannelId) -> Option<Channel> {
        self.channels.get(channel_id).await
    }

    pub async fn channels_for_league(&self, league_id: &LeagueId) -> Vec<Channel> {
        self.channels.channels_for_league(league_id).await
    }

    /// Newest `limit` retained messages, oldest first.
    pub async fn recent_messages(
        &self,
        channel_id: &ChannelId,
        limit: usize,
    ) -> BrokerErrorResult<Vec<Message>> {
        let slot = self.channels.slot(channel_id).await?;
        let state = slot.lock().await;
        Ok(state.history(limit))
    }

    pub async fn unread_count(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> BrokerErrorResult<u32> {
        self.channels.unread_count(channel_id, user_id).await
    }

    pub async fn online_users(&self, league_id: &LeagueId) -> Vec<UserId> {
        self.registry.online_users(league_id).await
    }

    pub async fn is_online(&self, league_id: &LeagueId, user_id: &UserId) -> bool {
        self.registry.is_online(league_id, user_id).await
    }

    pub async fn connections_for(&self, user_id: &UserId) -> HashSet<ConnectionId> {
        self.registry.connections_for(user_id).await
    }

    pub async fn identity(&self, connection_id: ConnectionId) -> Option<Identity> {
        self.registry.identity(connection_id).await
    }

    pub async fn connection_count(&self) -> usize {
        self.registry.total_count().await
    }

    pub async fn channel_count(&self) -> usize {
        self.channels.channel_count().await
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn channels(&self) -> &ChannelStore {
        &self.channels
    }

    pub fn typing(&self) -> &TypingTracker {
        &self.typing
    }

    pub fn dispatcher(&self) -> &FanoutDispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn shutdown_coordinator(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    async fn identity_of(&self, connection_id: ConnectionId) -> BrokerErrorResult<Identity> {
        self.registry
            .identity(connection_id)
            .await
            .ok_or_else(BrokerError::unauthenticated)
    }

    /// Direct reply; a full or closed queue only costs this connection its reply.
    async fn reply(&self, connection_id: ConnectionId, event: ServerEvent) {
        let name = event.name();
        if let Err(e) = self.dispatcher.send_to(connection_id, event).await {
            warn!("Could not deliver {name} to {connection_id}: {e}");
        }
    }
}
