use crate::ConnectionId;

use lc_core::UserId;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use uuid::Uuid;

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Correlation data for one inbound event
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
    /// Sequence number within this server instance
    pub request_seq: u64,
    /// Unset before `authenticate`
    pub user_id: Option<UserId>,
    pub connection_id: ConnectionId,
    pub started_at: Instant,
}

impl RequestContext {
    pub fn new(connection_id: ConnectionId, user_id: Option<UserId>) -> Self {
        let request_seq = REQUEST_COUNTER.fetch_add(1, Ordering::SeqCst);

        Self {
            correlation_id: format!("req-{}-{}", request_seq, Uuid::new_v4().as_simple()),
            request_seq,
            user_id,
            connection_id,
            started_at: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    pub fn log_prefix(&self) -> String {
        let connection = self.connection_id.to_string();
        let user = self
            .user_id
            .as_ref()
            .map_or("-", |user_id| user_id.as_str());
        format!(
            "[req={} user={} conn={}]",
            self.correlation_id,
            user,
            &connection[..8.min(connection.len())]
        )
    }
}
