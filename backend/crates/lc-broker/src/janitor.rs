use crate::{Broker, ServerEvent, ShutdownGuard};

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Background sweeps: expired typing indicators and over-long message logs.
///
/// Each sweep runs on its own task; a panicking sweep is logged and the loop
/// carries on with the next tick.
pub struct Janitor {
    handles: Vec<JoinHandle<()>>,
}

impl Janitor {
    pub fn spawn(broker: Broker) -> Self {
        let config = broker.config().clone();
        let coordinator = broker.shutdown_coordinator().clone();

        let typing = {
            let broker = broker.clone();
            spawn_sweep(
                "typing sweep",
                config.typing_sweep_interval(),
                coordinator.subscribe_guard(),
                move || {
                    let broker = broker.clone();
                    async move { broker.sweep_typing().await }
                },
            )
        };

        let truncation = spawn_sweep(
            "log truncation",
            config.log_truncation_interval(),
            coordinator.subscribe_guard(),
            move || {
                let broker = broker.clone();
                async move { broker.truncate_logs().await }
            },
        );

        Self {
            handles: vec![typing, truncation],
        }
    }

    /// Waits for both loops to observe shutdown.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!("Janitor task ended abnormally: {e}");
            }
        }
    }
}

fn spawn_sweep<F, Fut>(
    name: &'static str,
    period: Duration,
    mut shutdown: ShutdownGuard,
    mut sweep: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = usize> + Send + 'static,
{
    tokio::spawn(async move {
        // First tick one full period after start, not immediately.
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Janitor {name} running every {}s", period.as_secs());

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match tokio::spawn(sweep()).await {
                        Ok(0) => {}
                        Ok(swept) => debug!("Janitor {name} removed {swept} entries"),
                        Err(e) => error!("Janitor {name} panicked: {e}"),
                    }
                }
                _ = shutdown.wait() => break,
            }
        }

        info!("Janitor {name} stopped");
    })
}

impl Broker {
    /// Removes indicators older than the typing TTL and announces each with
    /// `user-stop-typing`. Returns the number expired.
    pub async fn sweep_typing(&self) -> usize {
        let expired = self.typing().expire(self.config().typing_ttl()).await;

        for indicator in &expired {
            self.dispatcher()
                .broadcast(
                    &indicator.channel_id,
                    ServerEvent::UserStopTyping {
                        channel_id: indicator.channel_id.clone(),
                        user_id: indicator.user_id.clone(),
                    },
                    None,
                )
                .await;
        }

        if !expired.is_empty() {
            self.metrics().typing_expired(expired.len());
        }
        expired.len()
    }

    /// Trims every channel log to the retention cap, oldest first, and drops
    /// the trimmed ids from the message index. Returns the number removed.
    pub async fn truncate_logs(&self) -> usize {
        let cap = self.config().message_retention_cap;
        let mut total = 0;

        for slot in self.channels().slots().await {
            let (channel_id, dropped) = {
                let mut state = slot.lock().await;
                (state.channel.id.clone(), state.log.truncate_to(cap))
            };

            if dropped.is_empty() {
                continue;
            }

            self.channels().forget_messages(&dropped).await;
            info!(
                "Truncated {} messages from {channel_id} (cap {cap})",
                dropped.len()
            );
            total += dropped.len();
        }

        self.metrics().messages_truncated(total);
        self.metrics()
            .channel_count(self.channels().channel_count().await);
        total
    }
}
