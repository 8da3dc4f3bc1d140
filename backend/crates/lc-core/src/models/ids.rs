use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Reserved sender identity for broker-generated messages.
pub const SYSTEM_USER_ID: &str = "system";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable user identity supplied by the (already authenticated) caller.
    UserId
);

string_id!(LeagueId);

string_id!(
    /// Channel identity, derived from channel type and scope.
    ChannelId
);

impl UserId {
    pub fn system() -> Self {
        Self(SYSTEM_USER_ID.to_string())
    }

    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_USER_ID
    }
}

impl ChannelId {
    pub fn league(league_id: &LeagueId) -> Self {
        Self(format!("league:{league_id}"))
    }

    pub fn commissioner(league_id: &LeagueId) -> Self {
        Self(format!("commissioner:{league_id}"))
    }

    pub fn team(league_id: &LeagueId, team_id: &str) -> Self {
        Self(format!("team:{league_id}:{team_id}"))
    }

    /// Trade channels are created on demand, so their scope is a fresh time-ordered id.
    pub fn trade(seq: MessageId) -> Self {
        Self(format!("trade:{seq}"))
    }
}

/// Time-ordered, process-unique message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out strictly increasing ids seeded from wall-clock microseconds.
///
/// Ids follow the clock while it moves forward and fall back to `previous + 1`
/// when two ids are requested within the same microsecond (or the clock steps
/// back), so ordering is never violated.
#[derive(Debug)]
pub struct MessageIdGenerator {
    last: AtomicU64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> MessageId {
        let now = now_micros();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return MessageId(candidate),
                Err(actual) => previous = actual,
            }
        }
    }
}

impl Default for MessageIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}
