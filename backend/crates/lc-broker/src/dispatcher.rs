use crate::{
    BrokerError, ConnectionId, Metrics, OfflineNotice, OfflineNotifier, OutboundFrame,
    Result as BrokerErrorResult, ServerEvent,
};

use lc_core::{ChannelId, LeagueId, UserId};

use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Delivers events to every live connection subscribed to a channel or league room.
///
/// Delivery is a non-blocking `try_send` into each connection's bounded queue;
/// a full or closed queue is logged and skipped so one slow subscriber never
/// holds up the rest.
pub struct FanoutDispatcher {
    inner: Arc<RwLock<DispatcherInner>>,
    notifier: Arc<dyn OfflineNotifier>,
    metrics: Metrics,
}

#[derive(Default)]
struct DispatcherInner {
    outboxes: HashMap<ConnectionId, mpsc::Sender<OutboundFrame>>,
    /// Channel room members, with the user behind each connection
    channel_rooms: HashMap<ChannelId, HashMap<ConnectionId, UserId>>,
    league_rooms: HashMap<LeagueId, HashSet<ConnectionId>>,
}

impl FanoutDispatcher {
    pub fn new(notifier: Arc<dyn OfflineNotifier>, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DispatcherInner::default())),
            notifier,
            metrics,
        }
    }

    pub async fn attach(&self, connection_id: ConnectionId, sender: mpsc::Sender<OutboundFrame>) {
        let mut inner = self.inner.write().await;
        inner.outboxes.insert(connection_id, sender);
        debug!("Attached outbox for connection {connection_id}");
    }

    /// Stops all routing to a connection and drops it from every room.
    pub async fn detach(&self, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;
        inner.outboxes.remove(&connection_id);

        inner.channel_rooms.retain(|_, members| {
            members.remove(&connection_id);
            !members.is_empty()
        });
        inner.league_rooms.retain(|_, members| {
            members.remove(&connection_id);
            !members.is_empty()
        });
        debug!("Detached connection {connection_id}");
    }

    /// No-op for connections without an outbox (already detached).
    pub async fn join_room(&self, channel_id: &ChannelId, connection_id: ConnectionId, user_id: UserId) {
        let mut inner = self.inner.write().await;
        if !inner.outboxes.contains_key(&connection_id) {
            return;
        }
        inner
            .channel_rooms
            .entry(channel_id.clone())
            .or_default()
            .insert(connection_id, user_id);
    }

    pub async fn join_league(&self, league_id: &LeagueId, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;
        if !inner.outboxes.contains_key(&connection_id) {
            return;
        }
        inner
            .league_rooms
            .entry(league_id.clone())
            .or_default()
            .insert(connection_id);
    }

    /// Users currently joined to a channel on a live connection.
    pub async fn viewers(&self, channel_id: &ChannelId) -> HashSet<UserId> {
        let inner = self.inner.read().await;
        inner
            .channel_rooms
            .get(channel_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn is_in_room(&self, channel_id: &ChannelId, connection_id: ConnectionId) -> bool {
        let inner = self.inner.read().await;
        inner
            .channel_rooms
            .get(channel_id)
            .is_some_and(|members| members.contains_key(&connection_id))
    }

    /// Returns the number of connections the event was queued for.
    pub async fn broadcast(
        &self,
        channel_id: &ChannelId,
        event: ServerEvent,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let inner = self.inner.read().await;
        let Some(members) = inner.channel_rooms.get(channel_id) else {
            debug!("No subscribers in {channel_id} for {}", event.name());
            return 0;
        };

        let targets = members.keys().copied().filter(|id| Some(*id) != exclude);
        self.deliver(&inner, targets, event)
    }

    pub async fn broadcast_league(
        &self,
        league_id: &LeagueId,
        event: ServerEvent,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let inner = self.inner.read().await;
        let Some(members) = inner.league_rooms.get(league_id) else {
            debug!("No subscribers in league {league_id} for {}", event.name());
            return 0;
        };

        let targets = members.iter().copied().filter(|id| Some(*id) != exclude);
        self.deliver(&inner, targets, event)
    }

    /// Every attached connection (server shutdown notice).
    pub async fn broadcast_all(&self, event: ServerEvent) -> usize {
        let inner = self.inner.read().await;
        let targets = inner.outboxes.keys().copied();
        self.deliver(&inner, targets, event)
    }

    /// Direct reply to one connection.
    pub async fn send_to(
        &self,
        connection_id: ConnectionId,
        event: ServerEvent,
    ) -> BrokerErrorResult<()> {
        self.send_frame(connection_id, OutboundFrame::event(event))
            .await
    }

    pub async fn send_frame(
        &self,
        connection_id: ConnectionId,
        frame: OutboundFrame,
    ) -> BrokerErrorResult<()> {
        let location = ErrorLocation::from(Location::caller());
        let inner = self.inner.read().await;
        let Some(outbox) = inner.outboxes.get(&connection_id) else {
            return Err(BrokerError::ConnectionClosed {
                reason: format!("connection {connection_id} is not attached"),
                location,
            });
        };

        outbox.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => {
                self.metrics.delivery_dropped("full");
                BrokerError::SendBufferFull {
                    connection_id: connection_id.to_string(),
                    location,
                }
            }
            TrySendError::Closed(_) => {
                self.metrics.delivery_dropped("closed");
                BrokerError::ConnectionClosed {
                    reason: format!("outbound queue of {connection_id} is closed"),
                    location,
                }
            }
        })
    }

    /// Fire-and-forget: the notifier runs on its own task.
    pub fn notify_offline(&self, notice: OfflineNotice) {
        if notice.participant_user_ids.is_empty() {
            return;
        }

        self.metrics
            .offline_notification(notice.participant_user_ids.len());
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let channel_id = notice.channel_id.clone();
            if let Err(e) = notifier.notify(notice).await {
                warn!("Offline notification for {channel_id} failed: {e}");
            }
        });
    }

    pub async fn subscriber_count(&self, channel_id: &ChannelId) -> usize {
        let inner = self.inner.read().await;
        inner.channel_rooms.get(channel_id).map_or(0, HashMap::len)
    }

    pub async fn room_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.channel_rooms.len()
    }

    pub async fn attached_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.outboxes.len()
    }

    fn deliver(
        &self,
        inner: &DispatcherInner,
        targets: impl Iterator<Item = ConnectionId>,
        event: ServerEvent,
    ) -> usize {
        let name = event.name();
        let frame = OutboundFrame::event(event);
        let mut delivered = 0;

        for connection_id in targets {
            let Some(outbox) = inner.outboxes.get(&connection_id) else {
                continue;
            };
            match outbox.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("Dropped {name} for slow connection {connection_id}: queue full");
                    self.metrics.delivery_dropped("full");
                }
                Err(TrySendError::Closed(_)) => {
                    info!("Dropped {name} for closed connection {connection_id}");
                    self.metrics.delivery_dropped("closed");
                }
            }
        }

        self.metrics.event_broadcast(name, delivered);
        delivered
    }
}

impl Clone for FanoutDispatcher {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            notifier: Arc::clone(&self.notifier),
            metrics: self.metrics.clone(),
        }
    }
}
