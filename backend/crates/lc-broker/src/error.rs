use crate::ServerEvent;
use crate::handlers::error_codes;

use lc_core::CoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Denied: {message} {location}")]
    Denied {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid state: {message} {location}")]
    InvalidState {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid message: {message} {location}")]
    InvalidMessage {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Connection is not authenticated {location}")]
    Unauthenticated { location: ErrorLocation },

    #[error("Rate limit exceeded: {limit} events per {window_secs}s {location}")]
    RateLimited {
        limit: u32,
        window_secs: u64,
        location: ErrorLocation,
    },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Send buffer full for connection {connection_id}, client too slow {location}")]
    SendBufferFull {
        connection_id: String,
        location: ErrorLocation,
    },

    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("JSON serialization failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl BrokerError {
    #[track_caller]
    pub fn denied(message: impl Into<String>) -> Self {
        Self::Denied {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
            field: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
            field: Some(field.to_string()),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Denied { .. } => error_codes::DENIED,
            Self::NotFound { .. } => error_codes::NOT_FOUND,
            Self::InvalidState { .. } => error_codes::INVALID_STATE,
            Self::InvalidMessage { .. } => error_codes::INVALID_MESSAGE,
            Self::Unauthenticated { .. } => error_codes::UNAUTHENTICATED,
            Self::RateLimited { .. } => error_codes::RATE_LIMITED,
            Self::ConnectionLimitExceeded { .. } => error_codes::CONNECTION_LIMIT,
            Self::SendBufferFull { .. } => error_codes::SLOW_CLIENT,
            Self::ConnectionClosed { .. } => error_codes::CONNECTION_CLOSED,
            Self::HeartbeatTimeout { .. } => error_codes::HEARTBEAT_TIMEOUT,
            Self::Serialization { .. } | Self::Internal { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Message safe to show a client: no source locations, no internal detail.
    pub fn client_message(&self) -> String {
        match self {
            Self::Denied { message, .. }
            | Self::NotFound { message, .. }
            | Self::InvalidState { message, .. } => message.clone(),
            Self::InvalidMessage { message, field, .. } => match field {
                Some(field) => format!("{field}: {message}"),
                None => message.clone(),
            },
            Self::Unauthenticated { .. } => "Authenticate before sending events".to_string(),
            Self::RateLimited { limit, window_secs, .. } => {
                format!("Too many events: limit is {limit} per {window_secs}s")
            }
            Self::ConnectionLimitExceeded { .. } => "Too many connections".to_string(),
            Self::SendBufferFull { .. } => "Client is not keeping up".to_string(),
            Self::ConnectionClosed { .. } => "Connection closed".to_string(),
            Self::HeartbeatTimeout { .. } => "Heartbeat timeout".to_string(),
            Self::Serialization { .. } | Self::Internal { .. } => {
                "An internal error occurred. Please try again later.".to_string()
            }
        }
    }

    /// The `error` event reported to the originating connection only.
    pub fn to_event(&self) -> ServerEvent {
        ServerEvent::Error {
            code: self.error_code().to_string(),
            message: self.client_message(),
        }
    }
}

impl From<serde_json::Error> for BrokerError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for BrokerError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            CoreError::Validation { message, .. } => Self::InvalidMessage {
                message,
                field: None,
                location,
            },
            CoreError::InvalidChannelType { value, .. } => Self::InvalidMessage {
                message: format!("unknown channel type '{value}'"),
                field: Some("type".to_string()),
                location,
            },
            CoreError::InvalidMessageKind { value, .. } => Self::InvalidMessage {
                message: format!("unknown message type '{value}'"),
                field: Some("messageType".to_string()),
                location,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, BrokerError>;
