//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// == Sweep Trait ==
/// Something holding entries that can be purged of expired ones.
#[async_trait]
pub trait Sweep: Send + Sync + 'static {
    /// Label used in log lines.
    fn name(&self) -> &'static str;

    /// Removes expired entries and returns how many were removed.
    async fn sweep_expired(&self) -> usize;
}

/// Spawns a background task that periodically sweeps `target`.
///
/// The first sweep happens one full `interval` after spawning. Lazy
/// expiration on read stays correct whether or not this task runs.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(ExpiringStore::<String>::default());
/// let handle = spawn_cleanup_task(store.clone(), Duration::from_secs(600));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<S: Sweep>(target: Arc<S>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let name = target.name();
        info!(sweep = name, ?interval, "Starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = target.sweep_expired().await;
            if removed > 0 {
                info!(sweep = name, removed, "Expiry sweep removed entries");
            } else {
                debug!(sweep = name, "Expiry sweep found nothing to remove");
            }
        }
    })
}
