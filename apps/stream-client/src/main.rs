//! Tradedash Stream Client Binary
//!
//! Runs the live-update client headless: connects to the dashboard
//! backend's push channel and logs which views would refresh on each
//! notification. Useful for watching a deployment's change stream and
//! for exercising the reconnect behavior against a real backend.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tradedash-stream-client
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_WS_URL`: Push-channel endpoint (default: `ws://localhost:8080/ws`)
//! - `DASHBOARD_RECONNECT_DELAY_BASE_MS`: Base reconnect delay (default: 3000)
//! - `DASHBOARD_RECONNECT_DELAY_MAX_MS`: Maximum reconnect delay (default: 30000)
//! - `DASHBOARD_RECONNECT_DELAY_MULTIPLIER`: Backoff multiplier (default: 2.0)
//! - `DASHBOARD_MAX_RECONNECT_ATTEMPTS`: Attempt cap, 0 = unlimited (default: 0)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use tokio::signal;
use tradedash_stream_client::infrastructure::telemetry;
use tradedash_stream_client::{
    DashboardConfig, NotificationHub, StreamClient, StreamClientConfig, View, subscribe_view,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    let _ = dotenvy::dotenv();

    telemetry::init();

    let config = DashboardConfig::from_env()?;
    tracing::info!(
        endpoint = %config.stream.endpoint,
        reconnect_base_ms = config.stream.reconnect_delay_base.as_millis(),
        reconnect_max_ms = config.stream.reconnect_delay_max.as_millis(),
        "Configuration loaded"
    );

    let hub = Arc::new(NotificationHub::new());

    // One consumer per view, each logging the refresh it would run.
    let handles: Vec<_> = View::ALL
        .into_iter()
        .map(|view| {
            subscribe_view(&hub, view, move |notification| {
                tracing::info!(
                    view = %view,
                    kind = %notification.kind(),
                    "view refresh triggered"
                );
            })
        })
        .collect();

    let client = Arc::new(StreamClient::new(
        StreamClientConfig::from(&config.stream),
        Arc::clone(&hub),
    ));

    client.connect();
    tracing::info!("stream client started");

    await_shutdown().await;

    client.disconnect();
    for handle in &handles {
        handle.unsubscribe();
    }

    tracing::info!("stream client stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
