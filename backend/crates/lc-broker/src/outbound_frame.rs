use crate::ServerEvent;

use std::sync::Arc;

use axum::body::Bytes;

/// Everything that travels through a connection's bounded outbound queue.
///
/// Broadcast events are shared behind an `Arc` so fan-out never deep-copies
/// a message per subscriber; serialization happens on the connection's send task.
#[derive(Debug, Clone)]
pub enum OutboundFrame {
    Event(Arc<ServerEvent>),
    Ping,
    Pong(Bytes),
}

impl OutboundFrame {
    pub fn event(event: ServerEvent) -> Self {
        Self::Event(Arc::new(event))
    }

    pub fn as_event(&self) -> Option<&ServerEvent> {
        match self {
            Self::Event(event) => Some(event),
            _ => None,
        }
    }
}
