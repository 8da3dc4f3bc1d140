use crate::{
    BrokerError, ConnectionId, ConnectionInfo, ConnectionLimits, Departure, Identity,
    Result as BrokerErrorResult,
};

use lc_core::{ChannelId, LeagueId, UserId};

use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::RwLock;

/// Registry for tracking live connections, the users behind them and league presence.
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
}

#[derive(Default)]
struct RegistryInner {
    /// All live connections by connection_id
    connections: HashMap<ConnectionId, ConnectionInfo>,
    /// Authenticated connections per user (multi-device)
    by_user: HashMap<UserId, HashSet<ConnectionId>>,
    /// Per league: online users and how many live connections back each one
    online: HashMap<LeagueId, HashMap<UserId, usize>>,
}

impl ConnectionRegistry {
    pub fn new(limits: ConnectionLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
            limits,
        }
    }

    /// Register a new, not yet authenticated connection.
    pub async fn register(&self) -> BrokerErrorResult<ConnectionId> {
        let location = ErrorLocation::from(Location::caller());
        let mut inner = self.inner.write().await;

        if inner.connections.len() >= self.limits.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                inner.connections.len(),
                self.limits.max_total
            );
            return Err(BrokerError::ConnectionLimitExceeded {
                current: inner.connections.len(),
                max: self.limits.max_total,
                location,
            });
        }

        let connection_id = ConnectionId::new();
        inner
            .connections
            .insert(connection_id, ConnectionInfo::new(connection_id));
        info!(
            "Registered connection {connection_id} ({} total)",
            inner.connections.len()
        );

        Ok(connection_id)
    }

    /// Bind an identity to a connection.
    ///
    /// Returns `true` when this is the user's first live connection for the league,
    /// i.e. the user just came online there.
    pub async fn authenticate(
        &self,
        connection_id: ConnectionId,
        identity: Identity,
    ) -> BrokerErrorResult<bool> {
        let location = ErrorLocation::from(Location::caller());
        let mut inner = self.inner.write().await;

        let Some(info) = inner.connections.get(&connection_id) else {
            return Err(BrokerError::NotFound {
                message: format!("connection {connection_id} is not registered"),
                location,
            });
        };

        if info.is_authenticated() {
            return Err(BrokerError::InvalidState {
                message: "connection is already authenticated".to_string(),
                location,
            });
        }

        let existing = inner
            .by_user
            .get(&identity.user_id)
            .map_or(0, HashSet::len);
        if existing >= self.limits.max_per_user {
            warn!(
                "Per-user connection limit reached for {}: {}/{}",
                identity.user_id, existing, self.limits.max_per_user
            );
            return Err(BrokerError::Denied {
                message: format!(
                    "user already has {existing} live connections (max {})",
                    self.limits.max_per_user
                ),
                location,
            });
        }

        inner
            .by_user
            .entry(identity.user_id.clone())
            .or_default()
            .insert(connection_id);

        let count = inner
            .online
            .entry(identity.league_id.clone())
            .or_default()
            .entry(identity.user_id.clone())
            .or_insert(0);
        *count += 1;
        let came_online = *count == 1;

        info!(
            "Connection {connection_id} authenticated as {} in league {}{}",
            identity.user_id,
            identity.league_id,
            if came_online { " (now online)" } else { "" }
        );

        if let Some(info) = inner.connections.get_mut(&connection_id) {
            info.identity = Some(identity);
        }

        Ok(came_online)
    }

    /// Remove a connection. Returns `None` if it was never registered (or already gone).
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Option<Departure> {
        let mut inner = self.inner.write().await;

        let info = inner.connections.remove(&connection_id)?;
        let mut went_offline = false;

        if let Some(identity) = &info.identity {
            if let Some(connections) = inner.by_user.get_mut(&identity.user_id) {
                connections.remove(&connection_id);
                if connections.is_empty() {
                    inner.by_user.remove(&identity.user_id);
                }
            }

            if let Some(users) = inner.online.get_mut(&identity.league_id) {
                if let Some(count) = users.get_mut(&identity.user_id) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        users.remove(&identity.user_id);
                        went_offline = true;
                    }
                }
                if users.is_empty() {
                    inner.online.remove(&identity.league_id);
                }
            }
        }

        info!(
            "Unregistered connection {connection_id} ({} total remaining)",
            inner.connections.len()
        );

        Some(Departure {
            connection_id,
            identity: info.identity,
            went_offline,
            joined_channels: info.joined_channels,
        })
    }

    pub async fn record_join(&self, connection_id: ConnectionId, channel_id: ChannelId) {
        let mut inner = self.inner.write().await;
        if let Some(info) = inner.connections.get_mut(&connection_id) {
            debug!("Connection {connection_id} joined {channel_id}");
            info.joined_channels.insert(channel_id);
        }
    }

    pub async fn identity(&self, connection_id: ConnectionId) -> Option<Identity> {
        let inner = self.inner.read().await;
        inner
            .connections
            .get(&connection_id)
            .and_then(|info| info.identity.clone())
    }

    pub async fn get(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        let inner = self.inner.read().await;
        inner.connections.get(&connection_id).cloned()
    }

    /// Every live connection (device) of a user.
    pub async fn connections_for(&self, user_id: &UserId) -> HashSet<ConnectionId> {
        let inner = self.inner.read().await;
        inner.by_user.get(user_id).cloned().unwrap_or_default()
    }

    /// A user's connections authenticated in one league.
    pub async fn connections_in_league(
        &self,
        user_id: &UserId,
        league_id: &LeagueId,
    ) -> HashSet<ConnectionId> {
        let inner = self.inner.read().await;
        let Some(connections) = inner.by_user.get(user_id) else {
            return HashSet::new();
        };
        connections
            .iter()
            .filter(|id| {
                inner
                    .connections
                    .get(*id)
                    .and_then(|info| info.identity.as_ref())
                    .is_some_and(|identity| identity.league_id == *league_id)
            })
            .copied()
            .collect()
    }

    /// Sorted for stable output.
    pub async fn online_users(&self, league_id: &LeagueId) -> Vec<UserId> {
        let inner = self.inner.read().await;
        let mut users: Vec<UserId> = inner
            .online
            .get(league_id)
            .map(|users| users.keys().cloned().collect())
            .unwrap_or_default();
        users.sort();
        users
    }

    pub async fn is_online(&self, league_id: &LeagueId, user_id: &UserId) -> bool {
        let inner = self.inner.read().await;
        inner
            .online
            .get(league_id)
            .is_some_and(|users| users.contains_key(user_id))
    }

    /// Subset of `users` with no live connection for the league.
    pub async fn offline_among(&self, league_id: &LeagueId, users: &[UserId]) -> Vec<UserId> {
        let inner = self.inner.read().await;
        let online = inner.online.get(league_id);
        users
            .iter()
            .filter(|user| !online.is_some_and(|o| o.contains_key(*user)))
            .cloned()
            .collect()
    }

    pub async fn total_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }

    /// Number of users with at least one authenticated connection.
    pub async fn user_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.by_user.len()
    }

    pub async fn league_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.online.len()
    }

    pub async fn connection_ids(&self) -> Vec<ConnectionId> {
        let inner = self.inner.read().await;
        inner.connections.keys().copied().collect()
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
        }
    }
}
