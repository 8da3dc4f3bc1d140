use metrics::{counter, gauge, histogram};

/// Metrics collector for broker operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "lc_broker" }
    }

    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Event received from a client
    pub fn event_received(&self, event: &str) {
        counter!(format!("{}.events.received", self.prefix)).increment(1);
        counter!(format!("{}.events.received.{}", self.prefix, event)).increment(1);
    }

    /// Event fanned out to `delivered` connections
    pub fn event_broadcast(&self, event: &str, delivered: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        counter!(format!("{}.events.sent.{}", self.prefix, event)).increment(delivered as u64);
    }

    /// Delivery to one connection failed (full or closed queue)
    pub fn delivery_dropped(&self, reason: &str) {
        counter!(format!("{}.delivery.dropped.{}", self.prefix, reason)).increment(1);
    }

    pub fn error_occurred(&self, error_code: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_code)).increment(1);
    }

    pub fn typing_expired(&self, count: usize) {
        counter!(format!("{}.typing.expired", self.prefix)).increment(count as u64);
    }

    pub fn messages_truncated(&self, count: usize) {
        counter!(format!("{}.messages.truncated", self.prefix)).increment(count as u64);
    }

    pub fn offline_notification(&self, recipients: usize) {
        counter!(format!("{}.notifications.offline", self.prefix)).increment(1);
        counter!(format!("{}.notifications.offline.recipients", self.prefix))
            .increment(recipients as u64);
    }

    /// Handler latency
    pub fn handler_latency(&self, duration: std::time::Duration) {
        histogram!(format!("{}.handlers.latency_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }

    pub fn channel_count(&self, count: usize) {
        gauge!(format!("{}.channels", self.prefix)).set(count as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
