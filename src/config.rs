//! Server configuration from environment variables.
//!
//! `HOST` (default `0.0.0.0`), `PORT` (default `8080`), `INACTIVITY_TIMEOUT_HOURS`
//! (default 12) and `CLEANUP_INTERVAL_MINUTES` (default 30). Missing, malformed or
//! out-of-range values fall back to the default.

use std::env;
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tournaments not accessed for this long are dropped from memory.
    pub inactivity_timeout: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            inactivity_timeout: Duration::from_secs(12 * 3600),
            cleanup_interval: Duration::from_secs(30 * 60),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Some(secs) = get("INACTIVITY_TIMEOUT_HOURS")
            .and_then(|h| h.parse::<u64>().ok())
            .and_then(|h| h.checked_mul(3600))
        {
            config.inactivity_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = get("CLEANUP_INTERVAL_MINUTES")
            .and_then(|m| m.parse::<u64>().ok())
            .filter(|&m| m > 0)
            .and_then(|m| m.checked_mul(60))
        {
            config.cleanup_interval = Duration::from_secs(secs);
        }
        config
    }

    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
