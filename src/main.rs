//! Shadow Cache - HTTP front for a shadowed TTL cache
//!
//! Serves Set/Get/Delete over HTTP from a local or Redis-shadowed cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shadow_cache::api::create_router;
use shadow_cache::{
    spawn_cleanup_task, AppState, Backend, Cache, Config, ExpiringStore, LocalCache, RedisStore,
    RemoteCache,
};

/// Main entry point for the Shadow Cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache for the configured backend and start its sweepers
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shadow_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shadow Cache Server");

    let config = Config::from_env();
    info!(
        backend = config.backend.as_str(),
        default_ttl = config.default_ttl,
        port = config.server_port,
        mirror_policy = ?config.mirror_policy,
        "Configuration loaded"
    );

    let (cache, sweepers) = build_cache(&config).await?;
    let state = AppState::new(cache, config.backend, config.default_ttl());
    info!("Cache initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweepers))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured cache and spawns the sweepers it needs.
async fn build_cache(
    config: &Config,
) -> anyhow::Result<(Arc<dyn Cache<String>>, Vec<JoinHandle<()>>)> {
    let mut sweepers = Vec::new();

    let cache: Arc<dyn Cache<String>> = match config.backend {
        Backend::Local => {
            let store: Arc<ExpiringStore<String>> =
                Arc::new(ExpiringStore::new(config.store_default_ttl()));
            sweepers.push(spawn_cleanup_task(
                store.clone(),
                config.store_cleanup_interval(),
            ));

            let cache = Arc::new(LocalCache::with_store(store));
            if let Some(interval) = config.index_sweep_interval() {
                sweepers.push(spawn_cleanup_task(cache.clone(), interval));
            }
            cache
        }
        Backend::Redis => {
            let store = RedisStore::connect(&config.redis_url)
                .await
                .with_context(|| format!("failed to connect to {}", config.redis_url))?;
            info!(url = %config.redis_url, "Connected to Redis");

            let mut cache =
                RemoteCache::<String, _>::new(store).with_mirror_policy(config.mirror_policy);
            if let Some(timeout) = config.remote_timeout() {
                cache = cache.with_timeout(timeout);
            }

            let cache = Arc::new(cache);
            if let Some(interval) = config.index_sweep_interval() {
                sweepers.push(spawn_cleanup_task(cache.clone(), interval));
            }
            cache
        }
    };

    Ok((cache, sweepers))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweepers and allows graceful shutdown.
async fn shutdown_signal(sweepers: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for sweeper in &sweepers {
        sweeper.abort();
    }
    warn!(count = sweepers.len(), "Sweep tasks aborted");
}
