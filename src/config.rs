//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::MirrorPolicy;
use crate::store::{DEFAULT_CLEANUP_INTERVAL, DEFAULT_EXPIRATION};

/// Which secondary store the served cache mirrors into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-process expiring store
    Local,
    /// Redis at `Config::redis_url`
    Redis,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Redis => "redis",
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "memory" => Ok(Backend::Local),
            "redis" | "remote" => Ok(Backend::Redis),
            other => Err(format!("unknown cache backend: {other}")),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secondary store behind the cache index
    pub backend: Backend,
    /// Redis connection URL, used by the redis backend
    pub redis_url: String,
    /// TTL in seconds for HTTP sets that carry none
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Expiring store default expiration in seconds
    pub store_default_ttl: u64,
    /// Expiring store sweep interval in seconds
    pub store_cleanup_interval: u64,
    /// Index sweep interval in seconds, None = lazy expiration only
    pub index_sweep_interval: Option<u64>,
    /// How failed mirror calls are reported
    pub mirror_policy: MirrorPolicy,
    /// Upper bound on each remote call in milliseconds
    pub remote_timeout_ms: Option<u64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `local` or `redis` (default: local)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_DEFAULT_TTL` - Expiring store default in seconds (default: 300)
    /// - `STORE_CLEANUP_INTERVAL` - Expiring store sweep in seconds (default: 600)
    /// - `INDEX_SWEEP_INTERVAL` - Index sweep in seconds (default: unset)
    /// - `MIRROR_POLICY` - `best_effort` or `strict` (default: best_effort)
    /// - `REMOTE_TIMEOUT_MS` - Remote call timeout (default: unset)
    ///
    /// Unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            store_default_ttl: parse_var("STORE_DEFAULT_TTL")
                .unwrap_or(defaults.store_default_ttl),
            store_cleanup_interval: parse_var("STORE_CLEANUP_INTERVAL")
                .unwrap_or(defaults.store_cleanup_interval),
            index_sweep_interval: parse_var("INDEX_SWEEP_INTERVAL").filter(|secs| *secs > 0),
            mirror_policy: parse_var("MIRROR_POLICY").unwrap_or(defaults.mirror_policy),
            remote_timeout_ms: parse_var("REMOTE_TIMEOUT_MS").filter(|ms| *ms > 0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn store_default_ttl(&self) -> Duration {
        Duration::from_secs(self.store_default_ttl)
    }

    pub fn store_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.store_cleanup_interval)
    }

    pub fn index_sweep_interval(&self) -> Option<Duration> {
        self.index_sweep_interval.map(Duration::from_secs)
    }

    pub fn remote_timeout(&self) -> Option<Duration> {
        self.remote_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            default_ttl: 300,
            server_port: 3000,
            store_default_ttl: DEFAULT_EXPIRATION.as_secs(),
            store_cleanup_interval: DEFAULT_CLEANUP_INTERVAL.as_secs(),
            index_sweep_interval: None,
            mirror_policy: MirrorPolicy::BestEffort,
            remote_timeout_ms: None,
        }
    }
}
