//! Stable error codes carried by outbound `error` events.

/// Caller lacks participant or sender rights
pub const DENIED: &str = "DENIED";

/// Channel or message id does not exist
pub const NOT_FOUND: &str = "NOT_FOUND";

/// Operation not valid for the current state (archived channel, double authenticate)
pub const INVALID_STATE: &str = "INVALID_STATE";

/// Malformed frame or failed field validation
pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";

/// Event received before `authenticate`
pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";

/// Per-connection rate limit exceeded
pub const RATE_LIMITED: &str = "RATE_LIMITED";

pub const CONNECTION_LIMIT: &str = "CONNECTION_LIMIT";

/// Outbound queue full
pub const SLOW_CLIENT: &str = "SLOW_CLIENT";

pub const CONNECTION_CLOSED: &str = "CONNECTION_CLOSED";

pub const HEARTBEAT_TIMEOUT: &str = "HEARTBEAT_TIMEOUT";

/// Handler exceeded its time budget
pub const TIMEOUT: &str = "TIMEOUT";

pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
