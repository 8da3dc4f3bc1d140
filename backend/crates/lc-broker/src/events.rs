//! Wire events. Every frame is `{"event": "<kebab-name>", "data": {...}}` with
//! camelCase fields inside `data`.

use lc_core::{Channel, ChannelId, LeagueId, Message, MessageId, MessageKind, Reactions, UserId};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events a client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    Authenticate {
        user_id: UserId,
        username: String,
        league_id: LeagueId,
    },
    JoinChannel {
        channel_id: ChannelId,
    },
    SendMessage(SendMessage),
    EditMessage {
        message_id: MessageId,
        new_message: String,
    },
    AddReaction {
        message_id: MessageId,
        emoji: String,
    },
    RemoveReaction {
        message_id: MessageId,
        emoji: String,
    },
    TypingStart {
        channel_id: ChannelId,
    },
    TypingStop {
        channel_id: ChannelId,
    },
    CreateTradeChannel {
        participant_ids: Vec<UserId>,
        trade_name: String,
    },
    ArchiveChannel {
        channel_id: ChannelId,
    },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authenticate { .. } => "authenticate",
            Self::JoinChannel { .. } => "join-channel",
            Self::SendMessage(_) => "send-message",
            Self::EditMessage { .. } => "edit-message",
            Self::AddReaction { .. } => "add-reaction",
            Self::RemoveReaction { .. } => "remove-reaction",
            Self::TypingStart { .. } => "typing-start",
            Self::TypingStop { .. } => "typing-stop",
            Self::CreateTradeChannel { .. } => "create-trade-channel",
            Self::ArchiveChannel { .. } => "archive-channel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub channel_id: ChannelId,
    /// Message body
    pub message: String,
    #[serde(default)]
    pub message_type: Option<MessageKind>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub reply_to: Option<MessageId>,
}

impl SendMessage {
    pub fn text(channel_id: ChannelId, message: impl Into<String>) -> Self {
        Self {
            channel_id,
            message: message.into(),
            message_type: None,
            metadata: None,
            reply_to: None,
        }
    }
}

/// Events the broker sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    Channels {
        channels: Vec<Channel>,
    },
    ChannelMessages {
        channel_id: ChannelId,
        messages: Vec<Message>,
    },
    NewMessage(Message),
    MessageEdited(Message),
    ReactionAdded {
        message_id: MessageId,
        channel_id: ChannelId,
        user_id: UserId,
        emoji: String,
        reactions: Reactions,
    },
    ReactionRemoved {
        message_id: MessageId,
        channel_id: ChannelId,
        user_id: UserId,
        emoji: String,
        reactions: Reactions,
    },
    UserTyping {
        channel_id: ChannelId,
        user_id: UserId,
        username: String,
    },
    UserStopTyping {
        channel_id: ChannelId,
        user_id: UserId,
    },
    TradeChannelCreated(Channel),
    ChannelArchived {
        channel_id: ChannelId,
    },
    UserOnline {
        user_id: UserId,
        username: String,
        league_id: LeagueId,
    },
    UserOffline {
        user_id: UserId,
        league_id: LeagueId,
    },
    Error {
        code: String,
        message: String,
    },
    ServerShutdown {
        reason: String,
    },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Channels { .. } => "channels",
            Self::ChannelMessages { .. } => "channel-messages",
            Self::NewMessage(_) => "new-message",
            Self::MessageEdited(_) => "message-edited",
            Self::ReactionAdded { .. } => "reaction-added",
            Self::ReactionRemoved { .. } => "reaction-removed",
            Self::UserTyping { .. } => "user-typing",
            Self::UserStopTyping { .. } => "user-stop-typing",
            Self::TradeChannelCreated(_) => "trade-channel-created",
            Self::ChannelArchived { .. } => "channel-archived",
            Self::UserOnline { .. } => "user-online",
            Self::UserOffline { .. } => "user-offline",
            Self::Error { .. } => "error",
            Self::ServerShutdown { .. } => "server-shutdown",
        }
    }
}
