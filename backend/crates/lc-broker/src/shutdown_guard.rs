use crate::ShutdownCoordinator;

use tokio::sync::broadcast;

/// Lets an async task wait for the shutdown signal
pub struct ShutdownGuard {
    shutdown_rx: broadcast::Receiver<()>,
    already_triggered: bool,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
            already_triggered: coordinator.is_shutdown(),
        }
    }

    /// Resolves once shutdown is triggered, including when it fired before the guard existed.
    pub async fn wait(&mut self) {
        if self.already_triggered {
            return;
        }
        let _ = self.shutdown_rx.recv().await;
        self.already_triggered = true;
    }

    /// Non-blocking check
    pub fn poll_shutdown(&mut self) -> bool {
        if !self.already_triggered && self.shutdown_rx.try_recv().is_ok() {
            self.already_triggered = true;
        }
        self.already_triggered
    }
}
