#![allow(dead_code)]

use lc_broker::{
    Broker, ConnectionId, ConnectionLimits, OfflineNotice, OfflineNotifier, OutboundFrame,
    Result as BrokerErrorResult, ServerEvent,
};
use lc_config::BrokerConfig;
use lc_core::{LeagueId, UserId};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

pub mod test_server;

/// Outbound queue size for in-process test clients
pub const TEST_QUEUE_SIZE: usize = 4096;

/// Notifier that keeps every notice for later inspection
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<OfflineNotice>>>,
}

impl RecordingNotifier {
    pub async fn notices(&self) -> Vec<OfflineNotice> {
        self.notices.lock().await.clone()
    }

    /// Notices are delivered on spawned tasks; give them a moment to land.
    pub async fn wait_for(&self, count: usize) -> Vec<OfflineNotice> {
        for _ in 0..50 {
            let notices = self.notices().await;
            if notices.len() >= count {
                return notices;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.notices().await
    }
}

#[async_trait]
impl OfflineNotifier for RecordingNotifier {
    async fn notify(&self, notice: OfflineNotice) -> BrokerErrorResult<()> {
        self.notices.lock().await.push(notice);
        Ok(())
    }
}

pub fn create_test_broker() -> (Broker, RecordingNotifier) {
    create_test_broker_with(BrokerConfig::default())
}

pub fn create_test_broker_with(config: BrokerConfig) -> (Broker, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let broker = Broker::new(config, ConnectionLimits::default(), Arc::new(notifier.clone()));
    (broker, notifier)
}

/// In-process client: a registered connection plus the receiving end of its queue
pub struct TestClient {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    rx: mpsc::Receiver<OutboundFrame>,
}

impl TestClient {
    pub async fn connect(broker: &Broker) -> Self {
        let (tx, rx) = mpsc::channel(TEST_QUEUE_SIZE);
        let connection_id = broker.connect(tx).await.expect("connect failed");
        Self {
            connection_id,
            user_id: UserId::from("anonymous"),
            rx,
        }
    }

    /// Connects and authenticates, discarding the `channels` reply.
    pub async fn authenticated(broker: &Broker, user: &str, league: &str) -> Self {
        let mut client = Self::connect(broker).await;
        broker
            .authenticate(
                client.connection_id,
                UserId::from(user),
                user,
                LeagueId::from(league),
            )
            .await
            .expect("authenticate failed");
        client.user_id = UserId::from(user);
        client.drain();
        client
    }

    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            if let Some(event) = frame.as_event() {
                events.push(event.clone());
            }
        }
        events
    }

    pub fn drain_named(&mut self, name: &str) -> Vec<ServerEvent> {
        self.drain()
            .into_iter()
            .filter(|event| event.name() == name)
            .collect()
    }
}
