use crate::{CoreError, CoreResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    League,
    Commissioner,
    Trade,
    Team,
}

impl ChannelType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::League => "league",
            Self::Commissioner => "commissioner",
            Self::Trade => "trade",
            Self::Team => "team",
        }
    }

    /// League and commissioner channels live as long as the league does.
    pub fn is_long_lived(&self) -> bool {
        matches!(self, Self::League | Self::Commissioner)
    }
}

impl FromStr for ChannelType {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "league" => Ok(Self::League),
            "commissioner" => Ok(Self::Commissioner),
            "trade" => Ok(Self::Trade),
            "team" => Ok(Self::Team),
            _ => Err(CoreError::InvalidChannelType {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
