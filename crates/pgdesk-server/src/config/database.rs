//! Per-request connection pool settings.

use serde::Deserialize;
use std::time::Duration;

/// Pool configuration loaded from environment variables.
///
/// Environment variables are prefixed with `PGDESK_POOL_`:
/// - `PGDESK_POOL_MAX_CONNECTIONS`: Connections per request pool (default: 2)
/// - `PGDESK_POOL_ACQUIRE_TIMEOUT`: Seconds to wait for a connection (default: 10)
/// - `PGDESK_POOL_STATEMENT_TIMEOUT`: Server-side statement timeout in seconds,
///   0 disables it (default: 0)
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Maximum connections in a request pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout: u64,

    /// Statement timeout in seconds (0 = unlimited)
    #[serde(default)]
    pub statement_timeout: u64,
}

fn default_max_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    10
}

impl PoolConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `PGDESK_POOL_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("PGDESK_POOL_").from_env::<PoolConfig>()
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }

    /// `statement_timeout` as a PostgreSQL setting value, if enabled.
    pub fn statement_timeout_setting(&self) -> Option<String> {
        (self.statement_timeout > 0).then(|| format!("{}s", self.statement_timeout))
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout: default_acquire_timeout(),
            statement_timeout: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(10));
        assert_eq!(config.statement_timeout_setting(), None);
    }

    #[test]
    fn test_statement_timeout_setting() {
        let config = PoolConfig {
            statement_timeout: 30,
            ..PoolConfig::default()
        };
        assert_eq!(config.statement_timeout_setting().as_deref(), Some("30s"));
    }
}
