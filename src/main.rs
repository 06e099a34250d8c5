//! Tagged Cache - demo host
//!
//! Starts a cache context, runs a short cache-aside round trip against a
//! simulated slow data source, then keeps the cleanup task alive until the
//! process is asked to stop.

use std::time::Duration;

use anyhow::Context as _;
use serde_json::{json, Value};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagged_cache::{keys, strategy, CacheConfig, CacheContext, GetOptions};

/// Stand-in for the authoritative store.
async fn load_event(id: String) -> anyhow::Result<Value> {
    tokio::time::sleep(Duration::from_millis(200)).await;
    Ok(json!({ "id": id, "title": "Launch day", "capacity": 120 }))
}

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Start the cache context (store, manager, cleanup task)
/// 4. Run the demo round trip
/// 5. Wait for SIGINT/SIGTERM and stop the cleanup task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagged_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: max_size={}, cleanup_interval={}s, l2_enabled={}",
        config.max_size, config.cleanup_interval, config.l2_enabled
    );

    let context: CacheContext<Value> =
        CacheContext::start(config).context("failed to start cache")?;
    let manager = context.manager();

    let key = keys::event("demo");
    for attempt in 1..=2 {
        let event = manager
            .get(
                &key,
                || load_event("demo".to_string()),
                &strategy::EVENTS,
                GetOptions::default(),
            )
            .await?;
        info!(attempt, %event, "event loaded");
    }

    let removed = manager.invalidate_event_cache(Some("demo")).await;
    info!(removed, "event cache invalidated");

    let stats = serde_json::to_string(&manager.stats().await)?;
    info!(%stats, "cache stats");

    shutdown_signal().await?;

    context.stop();
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?
            .recv()
            .await;
        anyhow::Ok(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<anyhow::Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
            result
        }
        result = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
            result
        }
    }
}
