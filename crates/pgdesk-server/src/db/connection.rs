//! Per-request database connections.
//!
//! Every API call names its own target database, so there is no long-lived
//! pool: a small pool is opened for the request and closed when it ends.

use std::future::Future;
use std::str::FromStr;

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use url::Url;

use crate::config::PoolConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::de;
use crate::sanitize::redact_connection_string;

const DEFAULT_PORT: u32 = 5432;

/// Where to connect: a full connection string, or the discrete fields of the
/// "standard" connection form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTarget {
    /// `postgres://` URL; wins over the discrete fields.
    #[serde(default)]
    pub connection_string: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub port: Option<u32>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub database: Option<String>,
}

impl ConnectionTarget {
    /// Resolve to a single connection string.
    ///
    /// Discrete fields are percent-encoded into a `postgresql://` URL. When
    /// neither a connection string nor host/username/database are present the
    /// request is rejected as missing its `connectionString`.
    pub fn resolve(&self) -> AppResult<String> {
        if let Some(conn) = non_blank(&self.connection_string) {
            return Ok(conn.to_string());
        }

        let (Some(host), Some(username), Some(database)) = (
            non_blank(&self.host),
            non_blank(&self.username),
            non_blank(&self.database),
        ) else {
            return Err(AppError::MissingField("connectionString"));
        };

        let port = self.port.unwrap_or(DEFAULT_PORT);
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid port: {}", port)))?;

        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]", host)
        } else {
            host.to_string()
        };

        let invalid = |what: &str| AppError::BadRequest(format!("Invalid {}", what));
        let mut url = Url::parse("postgresql://localhost").map_err(|e| AppError::Internal(e.to_string()))?;
        url.set_host(Some(&host)).map_err(|_| invalid("host"))?;
        url.set_port(Some(port)).map_err(|_| invalid("port"))?;
        url.set_username(username).map_err(|_| invalid("username"))?;
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password)).map_err(|_| invalid("password"))?;
        }
        url.set_path(database);

        Ok(url.to_string())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a connection string and apply the service-wide session settings.
pub fn connect_options(
    conn: &str,
    application_name: &str,
    config: &PoolConfig,
) -> AppResult<PgConnectOptions> {
    let options = PgConnectOptions::from_str(conn)
        .map_err(|e| AppError::BadRequest(format!("Invalid connection string: {}", e)))?
        .application_name(application_name);

    Ok(match config.statement_timeout_setting() {
        Some(timeout) => options.options([("statement_timeout", timeout)]),
        None => options,
    })
}

/// Open a request-scoped pool.
pub async fn open_pool(
    conn: &str,
    application_name: &str,
    config: &PoolConfig,
) -> AppResult<DbPool> {
    let options = connect_options(conn, application_name, config)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .min_connections(0)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(options)
        .await
        .map_err(AppError::Connect)?;

    tracing::debug!(
        target_db = %redact_connection_string(conn),
        "Opened request pool"
    );

    Ok(pool)
}

/// Open a pool for `conn`, run `f` against it and close the pool whether or
/// not `f` succeeded.
pub async fn with_pool<T, F, Fut>(
    conn: &str,
    application_name: &str,
    config: &PoolConfig,
    f: F,
) -> AppResult<T>
where
    F: FnOnce(DbPool) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let pool = open_pool(conn, application_name, config).await?;
    let result = f(pool.clone()).await;
    pool.close().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(host: &str, port: Option<u32>, user: &str, pw: &str, db: &str) -> ConnectionTarget {
        ConnectionTarget {
            connection_string: None,
            host: Some(host.into()),
            port,
            username: Some(user.into()),
            password: Some(pw.into()),
            database: Some(db.into()),
        }
    }

    #[test]
    fn test_connection_string_wins() {
        let mut target = standard("db", Some(5433), "u", "p", "d");
        target.connection_string = Some(" postgres://a@b/c ".into());
        assert_eq!(target.resolve().unwrap(), "postgres://a@b/c");
    }

    #[test]
    fn test_standard_fields_are_encoded() {
        let target = standard("db.internal", Some(6432), "app user", "p@ss:word/", "shop");
        let url = target.resolve().unwrap();
        assert!(url.starts_with("postgresql://app%20user:"));
        assert!(url.ends_with("@db.internal:6432/shop"));
        assert!(!url.contains("p@ss"));

        // round trip through the driver's own parser
        let options = PgConnectOptions::from_str(&url).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_username(), "app user");
        assert_eq!(options.get_database(), Some("shop"));
    }

    #[test]
    fn test_default_port() {
        let url = standard("localhost", None, "postgres", "", "postgres")
            .resolve()
            .unwrap();
        assert_eq!(url, "postgresql://postgres@localhost:5432/postgres");
    }

    #[test]
    fn test_ipv6_host() {
        let url = standard("::1", Some(5432), "u", "p", "d").resolve().unwrap();
        assert!(url.contains("@[::1]:5432/d"));
    }

    #[test]
    fn test_invalid_port() {
        let target = standard("localhost", Some(70000), "u", "p", "d");
        assert!(matches!(target.resolve(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_missing_everything() {
        let target = ConnectionTarget::default();
        assert!(matches!(
            target.resolve(),
            Err(AppError::MissingField("connectionString"))
        ));
    }

    #[test]
    fn test_deserialize_port_as_string() {
        let target: ConnectionTarget = serde_json::from_str(
            r#"{"host": "localhost", "port": "5433", "username": "u", "database": "d"}"#,
        )
        .unwrap();
        assert_eq!(target.port, Some(5433));
    }

    #[test]
    fn test_connect_options_rejects_garbage() {
        let result = connect_options("not a connection string", "pgdesk", &PoolConfig::default());
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_connect_options_applies_settings() {
        let options = connect_options(
            "postgres://u:p@localhost:5432/d",
            "pgdesk-test",
            &PoolConfig::default(),
        )
        .unwrap();
        assert_eq!(options.get_application_name(), Some("pgdesk-test"));
    }
}
