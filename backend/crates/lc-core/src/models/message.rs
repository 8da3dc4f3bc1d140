use crate::{ChannelId, LeagueId, MessageId, MessageKind, Reactions, UserId};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SYSTEM_DISPLAY_NAME: &str = "System";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub league_id: LeagueId,
    pub sender_id: UserId,
    pub sender_display_name: String,
    pub body: String,
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<MessageId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reactions: Reactions,
}

impl Message {
    pub fn from_draft(
        id: MessageId,
        channel_id: ChannelId,
        league_id: LeagueId,
        draft: MessageDraft,
    ) -> Self {
        Self {
            id,
            channel_id,
            league_id,
            sender_id: draft.sender_id,
            sender_display_name: draft.sender_display_name,
            body: draft.body,
            kind: draft.kind,
            metadata: draft.metadata,
            reply_to: draft.reply_to,
            created_at: Utc::now(),
            edited_at: None,
            reactions: Reactions::new(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.sender_id.is_system()
    }

    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// First `max_chars` characters of the body, for notification previews.
    pub fn preview(&self, max_chars: usize) -> String {
        self.body.chars().take(max_chars).collect()
    }
}

/// Everything a sender provides; id, channel and timestamps are assigned on append.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub sender_id: UserId,
    pub sender_display_name: String,
    pub body: String,
    pub kind: MessageKind,
    pub metadata: Option<Value>,
    pub reply_to: Option<MessageId>,
}

impl MessageDraft {
    pub fn text(sender_id: UserId, sender_display_name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender_id,
            sender_display_name: sender_display_name.into(),
            body: body.into(),
            kind: MessageKind::Text,
            metadata: None,
            reply_to: None,
        }
    }

    /// Broker-authored announcement. `metadata.isSystem` is always set.
    pub fn system(body: impl Into<String>, metadata: Option<Value>) -> Self {
        let mut fields = match metadata {
            Some(Value::Object(map)) => map,
            Some(other) => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
            None => Map::new(),
        };
        fields.insert("isSystem".to_string(), Value::Bool(true));

        Self {
            sender_id: UserId::system(),
            sender_display_name: SYSTEM_DISPLAY_NAME.to_string(),
            body: body.into(),
            kind: MessageKind::Announcement,
            metadata: Some(Value::Object(fields)),
            reply_to: None,
        }
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_metadata(mut self, metadata: Option<Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_reply_to(mut self, reply_to: Option<MessageId>) -> Self {
        self.reply_to = reply_to;
        self
    }
}
