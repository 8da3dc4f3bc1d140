use crate::{CoreError, CoreResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    Emoji,
    Gif,
    Announcement,
    TradeProposal,
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Emoji => "emoji",
            Self::Gif => "gif",
            Self::Announcement => "announcement",
            Self::TradeProposal => "trade_proposal",
        }
    }

    /// Kinds whose content may live entirely in metadata (a gif url, an emoji code).
    pub fn allows_empty_body(&self) -> bool {
        matches!(self, Self::Gif | Self::Emoji)
    }
}

impl FromStr for MessageKind {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "text" => Ok(Self::Text),
            "emoji" => Ok(Self::Emoji),
            "gif" => Ok(Self::Gif),
            "announcement" => Ok(Self::Announcement),
            "trade_proposal" => Ok(Self::TradeProposal),
            _ => Err(CoreError::InvalidMessageKind {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
