use lc_server::{ServerError, build_router, logger};

use lc_broker::{AppState, Broker, ConnectionLimits, LoggingNotifier, RateLimiterFactory};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional (development)
    let _ = dotenvy::dotenv();

    // Load and validate configuration
    let config = lc_config::Config::load()?;
    config.validate()?;

    let log_file_path = config.log_file_path()?;
    if let Some(dir) = log_file_path.as_ref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(dir)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting lc-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::MetricsExporter {
            message: e.to_string(),
        })?;
    info!("Prometheus recorder installed");

    let broker = Broker::start(
        config.broker.clone(),
        ConnectionLimits::from(&config.server),
        Arc::new(LoggingNotifier),
    )
    .await;
    info!("Broker started");

    let app_state = AppState::new(
        broker.clone(),
        RateLimiterFactory::new(config.rate_limit.clone()),
        config.websocket.clone(),
    );
    let app = build_router(app_state, Some(prometheus));

    let listener = TcpListener::bind(config.bind_addr()).await?;

    // Actual bound address matters when port is 0 (auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {actual_addr}");

    let broker_for_signal = broker.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                broker_for_signal.shutdown("server is shutting down").await;
            }
            Err(e) => error!("Failed to listen for SIGINT: {e}"),
        }
    });

    if config.server.idle_shutdown_secs > 0 {
        spawn_idle_monitor(broker.clone(), config.server.idle_shutdown_secs);
    }

    info!("Server ready to accept connections");
    let shutdown = broker.shutdown_coordinator().clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Graceful shutdown started");
        })
        .await?;

    info!("Graceful shutdown complete");

    Ok(())
}

/// Shuts the broker down after two consecutive idle checks with no connections.
fn spawn_idle_monitor(broker: Broker, idle_timeout: u64) {
    info!("Idle shutdown enabled: {idle_timeout}s timeout");

    tokio::spawn(async move {
        let grace_period = idle_timeout.min(60);
        tokio::time::sleep(Duration::from_secs(grace_period)).await;

        let check_interval = Duration::from_secs((idle_timeout / 2).max(10));
        let mut guard = broker.shutdown_coordinator().subscribe_guard();

        loop {
            tokio::select! {
                _ = tokio::time::sleep(check_interval) => {}
                _ = guard.wait() => return,
            }
            if broker.connection_count().await > 0 {
                continue;
            }

            info!("No active connections, checking again in {}s", check_interval.as_secs());
            tokio::time::sleep(check_interval).await;

            if broker.connection_count().await == 0 {
                warn!("No connections for {idle_timeout}s, initiating auto-shutdown");
                broker.shutdown("idle shutdown").await;
                return;
            }
            info!("Connection established, continuing");
        }
    });
}
