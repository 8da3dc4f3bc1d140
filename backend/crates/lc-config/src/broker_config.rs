use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Typing indicator lifetime (seconds)
pub const MIN_TYPING_TTL_SECS: u64 = 1;
pub const MAX_TYPING_TTL_SECS: u64 = 120;
pub const DEFAULT_TYPING_TTL_SECS: u64 = 10;

// Janitor typing sweep (seconds)
pub const MIN_TYPING_SWEEP_INTERVAL_SECS: u64 = 1;
pub const MAX_TYPING_SWEEP_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_TYPING_SWEEP_INTERVAL_SECS: u64 = 30;

// Janitor log truncation (seconds)
pub const MIN_LOG_TRUNCATION_INTERVAL_SECS: u64 = 10;
pub const MAX_LOG_TRUNCATION_INTERVAL_SECS: u64 = 86400;
pub const DEFAULT_LOG_TRUNCATION_INTERVAL_SECS: u64 = 300;

// Messages kept per channel after truncation
pub const MIN_MESSAGE_RETENTION_CAP: usize = 10;
pub const MAX_MESSAGE_RETENTION_CAP: usize = 100000;
pub const DEFAULT_MESSAGE_RETENTION_CAP: usize = 1000;

// Messages sent to a client on join
pub const MIN_HISTORY_LIMIT: usize = 1;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

pub const MIN_MAX_MESSAGE_LENGTH: usize = 1;
pub const MAX_MAX_MESSAGE_LENGTH: usize = 20000;
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 2000;

pub const MIN_MAX_TRADE_PARTICIPANTS: usize = 2;
pub const MAX_MAX_TRADE_PARTICIPANTS: usize = 64;
pub const DEFAULT_MAX_TRADE_PARTICIPANTS: usize = 12;

pub const MIN_MAX_REACTIONS_PER_MESSAGE: usize = 1;
pub const MAX_MAX_REACTIONS_PER_MESSAGE: usize = 500;
pub const DEFAULT_MAX_REACTIONS_PER_MESSAGE: usize = 50;

/// Chat broker behaviour: retention, typing expiry, janitor cadence and message limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub typing_ttl_secs: u64,
    pub typing_sweep_interval_secs: u64,
    pub log_truncation_interval_secs: u64,
    pub message_retention_cap: usize,
    pub history_limit: usize,
    pub max_message_length: usize,
    pub max_trade_participants: usize,
    /// Distinct emoji allowed on a single message
    pub max_reactions_per_message: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            typing_ttl_secs: DEFAULT_TYPING_TTL_SECS,
            typing_sweep_interval_secs: DEFAULT_TYPING_SWEEP_INTERVAL_SECS,
            log_truncation_interval_secs: DEFAULT_LOG_TRUNCATION_INTERVAL_SECS,
            message_retention_cap: DEFAULT_MESSAGE_RETENTION_CAP,
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            max_trade_participants: DEFAULT_MAX_TRADE_PARTICIPANTS,
            max_reactions_per_message: DEFAULT_MAX_REACTIONS_PER_MESSAGE,
        }
    }
}

impl BrokerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.typing_ttl_secs < MIN_TYPING_TTL_SECS || self.typing_ttl_secs > MAX_TYPING_TTL_SECS
        {
            return Err(ConfigError::broker(format!(
                "broker.typing_ttl_secs must be {}-{}, got {}",
                MIN_TYPING_TTL_SECS, MAX_TYPING_TTL_SECS, self.typing_ttl_secs
            )));
        }

        if self.typing_sweep_interval_secs < MIN_TYPING_SWEEP_INTERVAL_SECS
            || self.typing_sweep_interval_secs > MAX_TYPING_SWEEP_INTERVAL_SECS
        {
            return Err(ConfigError::broker(format!(
                "broker.typing_sweep_interval_secs must be {}-{}, got {}",
                MIN_TYPING_SWEEP_INTERVAL_SECS,
                MAX_TYPING_SWEEP_INTERVAL_SECS,
                self.typing_sweep_interval_secs
            )));
        }

        if self.log_truncation_interval_secs < MIN_LOG_TRUNCATION_INTERVAL_SECS
            || self.log_truncation_interval_secs > MAX_LOG_TRUNCATION_INTERVAL_SECS
        {
            return Err(ConfigError::broker(format!(
                "broker.log_truncation_interval_secs must be {}-{}, got {}",
                MIN_LOG_TRUNCATION_INTERVAL_SECS,
                MAX_LOG_TRUNCATION_INTERVAL_SECS,
                self.log_truncation_interval_secs
            )));
        }

        if self.message_retention_cap < MIN_MESSAGE_RETENTION_CAP
            || self.message_retention_cap > MAX_MESSAGE_RETENTION_CAP
        {
            return Err(ConfigError::broker(format!(
                "broker.message_retention_cap must be {}-{}, got {}",
                MIN_MESSAGE_RETENTION_CAP, MAX_MESSAGE_RETENTION_CAP, self.message_retention_cap
            )));
        }

        // History is served from the retained log, so it can never exceed the cap.
        if self.history_limit < MIN_HISTORY_LIMIT || self.history_limit > self.message_retention_cap
        {
            return Err(ConfigError::broker(format!(
                "broker.history_limit must be {}-{} (message_retention_cap), got {}",
                MIN_HISTORY_LIMIT, self.message_retention_cap, self.history_limit
            )));
        }

        if self.max_message_length < MIN_MAX_MESSAGE_LENGTH
            || self.max_message_length > MAX_MAX_MESSAGE_LENGTH
        {
            return Err(ConfigError::broker(format!(
                "broker.max_message_length must be {}-{}, got {}",
                MIN_MAX_MESSAGE_LENGTH, MAX_MAX_MESSAGE_LENGTH, self.max_message_length
            )));
        }

        if self.max_trade_participants < MIN_MAX_TRADE_PARTICIPANTS
            || self.max_trade_participants > MAX_MAX_TRADE_PARTICIPANTS
        {
            return Err(ConfigError::broker(format!(
                "broker.max_trade_participants must be {}-{}, got {}",
                MIN_MAX_TRADE_PARTICIPANTS, MAX_MAX_TRADE_PARTICIPANTS, self.max_trade_participants
            )));
        }

        if self.max_reactions_per_message < MIN_MAX_REACTIONS_PER_MESSAGE
            || self.max_reactions_per_message > MAX_MAX_REACTIONS_PER_MESSAGE
        {
            return Err(ConfigError::broker(format!(
                "broker.max_reactions_per_message must be {}-{}, got {}",
                MIN_MAX_REACTIONS_PER_MESSAGE,
                MAX_MAX_REACTIONS_PER_MESSAGE,
                self.max_reactions_per_message
            )));
        }

        Ok(())
    }

    pub fn typing_ttl(&self) -> Duration {
        Duration::from_secs(self.typing_ttl_secs)
    }

    pub fn typing_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.typing_sweep_interval_secs)
    }

    pub fn log_truncation_interval(&self) -> Duration {
        Duration::from_secs(self.log_truncation_interval_secs)
    }
}
