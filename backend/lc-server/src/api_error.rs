//! Admin API error types
//!
//! Broker errors are mapped onto HTTP status codes with the same stable
//! codes the WebSocket `error` event carries.

use lc_broker::{
    BrokerError, DENIED, INTERNAL_ERROR, INVALID_MESSAGE, INVALID_STATE, NOT_FOUND,
};

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// 400
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// 403
    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    /// 409: archived channel, long-lived channel, duplicate commissioner channel
    #[error("Conflict: {message} {location}")]
    Conflict {
        message: String,
        location: ErrorLocation,
    },

    /// 500
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }

        let body = match self {
            ApiError::NotFound { message, .. } => ApiErrorBody {
                code: NOT_FOUND.into(),
                message,
                field: None,
            },
            ApiError::Validation { message, field, .. } => ApiErrorBody {
                code: INVALID_MESSAGE.into(),
                message,
                field,
            },
            ApiError::Forbidden { message, .. } => ApiErrorBody {
                code: DENIED.into(),
                message,
                field: None,
            },
            ApiError::Conflict { message, .. } => ApiErrorBody {
                code: INVALID_STATE.into(),
                message,
                field: None,
            },
            // Internal details stay in the log
            ApiError::Internal { .. } => ApiErrorBody {
                code: INTERNAL_ERROR.into(),
                message: "An internal error occurred".to_string(),
                field: None,
            },
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

impl From<BrokerError> for ApiError {
    #[track_caller]
    fn from(e: BrokerError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match e {
            BrokerError::NotFound { message, .. } => ApiError::NotFound { message, location },
            BrokerError::InvalidMessage { message, field, .. } => ApiError::Validation {
                message,
                field,
                location,
            },
            BrokerError::Denied { message, .. } => ApiError::Forbidden { message, location },
            BrokerError::InvalidState { message, .. } => ApiError::Conflict { message, location },
            other => ApiError::Internal {
                message: other.to_string(),
                location,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
