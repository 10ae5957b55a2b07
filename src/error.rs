//! Error types for the shadow cache
//!
//! Provides unified error handling using thiserror.

use std::fmt;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Mirror Operation ==
/// The mirrored call that failed against a secondary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOp {
    Put,
    Delete,
}

impl fmt::Display for MirrorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorOp::Put => f.write_str("put"),
            MirrorOp::Delete => f.write_str("delete"),
        }
    }
}

// == Store Error Enum ==
/// Failure reported by a secondary store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store unreachable or connection dropped
    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),

    /// Store rejected or failed the command
    #[error("Store operation failed: {0}")]
    OperationFailed(String),

    /// Call did not complete within the caller-supplied timeout
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),

    /// Value could not be encoded for the wire
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
            StoreError::ConnectionFailed(err.to_string())
        } else {
            StoreError::OperationFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent from the index or past its deadline
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Mirrored call failed; the local index was still updated
    #[error("Mirror {op} failed for key '{key}': {source}")]
    Mirror {
        op: MirrorOp,
        key: String,
        #[source]
        source: StoreError,
    },
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Mirror { .. } => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = CacheError::NotFound("user:1".to_string());
        assert_eq!(error.to_string(), "Key not found: user:1");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_mirror_display_includes_source() {
        let error = CacheError::Mirror {
            op: MirrorOp::Put,
            key: "k".to_string(),
            source: StoreError::Timeout(Duration::from_millis(50)),
        };
        assert_eq!(
            error.to_string(),
            "Mirror put failed for key 'k': Store call timed out after 50ms"
        );
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_status_codes() {
        let not_found = CacheError::NotFound("k".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let mirror = CacheError::Mirror {
            op: MirrorOp::Delete,
            key: "k".to_string(),
            source: StoreError::ConnectionFailed("refused".to_string()),
        }
        .into_response();
        assert_eq!(mirror.status(), StatusCode::BAD_GATEWAY);
    }
}
