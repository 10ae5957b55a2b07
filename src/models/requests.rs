//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under; may be empty
/// - `value`: The value to store
/// - `ttl`: Optional TTL in seconds (uses default if not specified); 0 expires at once
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}
