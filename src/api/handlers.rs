//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{Cache, LocalCache};
use crate::config::Backend;
use crate::error::Result;
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache synchronizes internally, so handlers share it through a plain
/// `Arc` without an outer lock.
#[derive(Clone)]
pub struct AppState {
    /// Cache serving every request
    pub cache: Arc<dyn Cache<String>>,
    /// Secondary store behind the cache, reported by /stats
    pub backend: Backend,
    /// TTL for sets that do not carry one
    pub default_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState around an already wired cache.
    pub fn new(cache: Arc<dyn Cache<String>>, backend: Backend, default_ttl: Duration) -> Self {
        Self {
            cache,
            backend,
            default_ttl,
        }
    }

    /// Creates an AppState over a local cache.
    pub fn local(cache: LocalCache<String>, default_ttl: Duration) -> Self {
        Self::new(Arc::new(cache), Backend::Local, default_ttl)
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let ttl = req
        .ttl
        .map(Duration::from_secs)
        .unwrap_or(state.default_ttl);

    state.cache.set(&req.key, req.value, ttl).await?;

    Ok(Json(SetResponse::new(req.key, ttl.as_secs())))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state.cache.get(&key).await?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Absent keys are not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;

    Json(StatsResponse::new(state.backend.as_str(), stats))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::local(LocalCache::new(), Duration::from_secs(300))
    }

    fn set_request(key: &str, value: &str, ttl: Option<u64>) -> Json<SetRequest> {
        Json(SetRequest {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let request = set_request("test_key", "test_value", None);
        let result = set_handler(State(state.clone()), request).await;
        assert_eq!(result.unwrap().ttl, 300, "default TTL applied");

        let result = get_handler(State(state.clone()), Path("test_key".to_string())).await;
        assert_eq!(result.unwrap().value, "test_value");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_set_zero_ttl_expires_immediately() {
        let state = test_state();

        let Json(response) = set_handler(State(state.clone()), set_request("k", "v", Some(0)))
            .await
            .unwrap();
        assert_eq!(response.ttl, 0);

        let result = get_handler(State(state), Path("k".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_set_empty_key() {
        let state = test_state();

        let result = set_handler(State(state.clone()), set_request("", "value", None)).await;
        assert!(result.is_ok());
        assert_eq!(state.cache.get("").await.unwrap(), "value");
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        let Json(response) =
            set_handler(State(state.clone()), set_request("to_delete", "value", None))
                .await
                .unwrap();
        assert_eq!(response.key, "to_delete");

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let result = get_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_err());

        let result = delete_handler(State(state), Path("to_delete".to_string())).await;
        assert!(result.is_ok(), "deleting an absent key succeeds");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        let _ = get_handler(State(state.clone()), Path("missing".to_string())).await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.backend, "local");
        assert_eq!(response.stats.hits, 0);
        assert_eq!(response.stats.misses, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
