mod channel_store;
mod message_validator;
mod property_tests;

use crate::{OutboundFrame, ServerEvent};

use tokio::sync::mpsc;

/// Every event currently queued on an outbox, in order.
pub(crate) fn drain_events(rx: &mut mpsc::Receiver<OutboundFrame>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        if let Some(event) = frame.as_event() {
            events.push(event.clone());
        }
    }
    events
}
