//! Application configuration for the pgdesk API.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `PGDESK_`:
/// - `PGDESK_HOST`: Server bind address (default: "127.0.0.1")
/// - `PGDESK_PORT`: Server port (default: 4000)
/// - `PGDESK_DATA_DIR`: Where the saved session lives (default: platform data dir)
/// - `PGDESK_ROW_LIMIT`: Maximum rows returned when browsing a table (default: 1000)
/// - `PGDESK_APPLICATION_NAME`: `application_name` reported to PostgreSQL
/// - `PGDESK_LOG_JSON`: Emit JSON logs (default: false)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `session.json`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Cap on rows returned by table browsing
    #[serde(default = "default_row_limit")]
    pub row_limit: u32,

    /// Name this service reports to the database server
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Emit JSON formatted logs
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_row_limit() -> u32 {
    1000
}

fn default_application_name() -> String {
    "pgdesk".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `PGDESK_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("PGDESK_").from_env::<AppConfig>()
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the data directory, falling back to `<platform data dir>/pgdesk`
    /// and finally to `./.pgdesk` when the platform has none.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("pgdesk"))
                .unwrap_or_else(|| PathBuf::from(".pgdesk"))
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: None,
            row_limit: default_row_limit(),
            application_name: default_application_name(),
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.row_limit, 1000);
        assert!(!config.log_json);
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:4000");
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/tmp/pgdesk-test")),
            ..AppConfig::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/pgdesk-test"));
    }

    #[test]
    fn test_from_iter_parses_values() {
        let vars = vec![
            ("PGDESK_PORT".to_string(), "4100".to_string()),
            ("PGDESK_ROW_LIMIT".to_string(), "50".to_string()),
            ("PGDESK_LOG_JSON".to_string(), "true".to_string()),
        ];
        let config: AppConfig = envy::prefixed("PGDESK_").from_iter(vars).unwrap();
        assert_eq!(config.port, 4100);
        assert_eq!(config.row_limit, 50);
        assert!(config.log_json);
        assert_eq!(config.host, "127.0.0.1");
    }
}
