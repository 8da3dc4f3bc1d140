use crate::{BrokerError, Result as BrokerErrorResult};

use lc_core::MessageKind;

use serde_json::Value;

pub const MAX_ID_LENGTH: usize = 128;
pub const MAX_USERNAME_LENGTH: usize = 64;
pub const MAX_CHANNEL_NAME_LENGTH: usize = 100;
pub const MAX_EMOJI_LENGTH: usize = 32;

/// Validates client-supplied fields before they reach broker state
pub struct MessageValidator;

impl MessageValidator {
    /// Trims the body and enforces emptiness and length rules.
    ///
    /// An empty body is only accepted for gif and emoji messages that carry metadata.
    #[track_caller]
    pub fn validate_body(
        body: &str,
        kind: MessageKind,
        metadata: Option<&Value>,
        max_length: usize,
    ) -> BrokerErrorResult<String> {
        let trimmed = body.trim();

        if trimmed.is_empty() && !(kind.allows_empty_body() && metadata.is_some()) {
            return Err(BrokerError::invalid_field("message", "message cannot be empty"));
        }

        let length = trimmed.chars().count();
        if length > max_length {
            return Err(BrokerError::invalid_field(
                "message",
                format!("message exceeds maximum length ({length} > {max_length})"),
            ));
        }

        Ok(trimmed.to_string())
    }

    /// Identifier fields (user, league, team ids): non-empty, bounded, no whitespace.
    #[track_caller]
    pub fn validate_id(value: &str, field_name: &str) -> BrokerErrorResult<()> {
        if value.is_empty() {
            return Err(BrokerError::invalid_field(
                field_name,
                format!("{field_name} cannot be empty"),
            ));
        }

        if value.len() > MAX_ID_LENGTH {
            return Err(BrokerError::invalid_field(
                field_name,
                format!("{field_name} exceeds maximum length ({MAX_ID_LENGTH})"),
            ));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(BrokerError::invalid_field(
                field_name,
                format!("{field_name} cannot contain whitespace"),
            ));
        }

        Ok(())
    }

    /// Trimmed string between `min_length` and `max_length` characters.
    #[track_caller]
    pub fn validate_string(
        value: &str,
        field_name: &str,
        min_length: usize,
        max_length: usize,
    ) -> BrokerErrorResult<String> {
        let trimmed = value.trim();
        let length = trimmed.chars().count();

        if length < min_length {
            return Err(BrokerError::invalid_field(
                field_name,
                format!("{field_name} must be at least {min_length} characters"),
            ));
        }

        if length > max_length {
            return Err(BrokerError::invalid_field(
                field_name,
                format!("{field_name} must not exceed {max_length} characters"),
            ));
        }

        Ok(trimmed.to_string())
    }

    #[track_caller]
    pub fn validate_username(username: &str) -> BrokerErrorResult<String> {
        Self::validate_string(username, "username", 1, MAX_USERNAME_LENGTH)
    }

    #[track_caller]
    pub fn validate_channel_name(name: &str) -> BrokerErrorResult<String> {
        Self::validate_string(name, "name", 1, MAX_CHANNEL_NAME_LENGTH)
    }

    #[track_caller]
    pub fn validate_emoji(emoji: &str) -> BrokerErrorResult<()> {
        if emoji.is_empty() || emoji.trim() != emoji {
            return Err(BrokerError::invalid_field(
                "emoji",
                "emoji cannot be empty or padded with whitespace",
            ));
        }

        if emoji.chars().count() > MAX_EMOJI_LENGTH {
            return Err(BrokerError::invalid_field(
                "emoji",
                format!("emoji exceeds maximum length ({MAX_EMOJI_LENGTH})"),
            ));
        }

        Ok(())
    }
}
