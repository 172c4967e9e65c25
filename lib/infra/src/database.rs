//! Relational store connection pool.

use crate::error::InfraError;
use rootcause::prelude::Report;
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;

/// PostgreSQL connection settings.
///
/// Pool limits of zero leave sqlx's own default in place.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_database")]
    pub database: String,
    /// One of libpq's `sslmode` values ("disable", "prefer", "require", ...).
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(default = "default_max_open_conns")]
    pub max_open_conns: u32,
    #[serde(default = "default_max_idle_conns")]
    pub max_idle_conns: u32,
    #[serde(default = "default_conn_max_lifetime_secs")]
    pub conn_max_lifetime_secs: u64,
    #[serde(default = "default_conn_max_idle_time_secs")]
    pub conn_max_idle_time_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_password() -> String {
    "postgres".to_string()
}

fn default_database() -> String {
    "usergate".to_string()
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}

fn default_max_open_conns() -> u32 {
    100
}

fn default_max_idle_conns() -> u32 {
    10
}

fn default_conn_max_lifetime_secs() -> u64 {
    3600
}

fn default_conn_max_idle_time_secs() -> u64 {
    600
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: default_password(),
            database: default_database(),
            ssl_mode: default_ssl_mode(),
            max_open_conns: default_max_open_conns(),
            max_idle_conns: default_max_idle_conns(),
            conn_max_lifetime_secs: default_conn_max_lifetime_secs(),
            conn_max_idle_time_secs: default_conn_max_idle_time_secs(),
        }
    }
}

impl DatabaseConfig {
    /// Builds sqlx connect options from the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if `ssl_mode` is not a recognized mode.
    pub fn connect_options(&self) -> Result<PgConnectOptions, InfraError> {
        let ssl_mode =
            PgSslMode::from_str(&self.ssl_mode).map_err(|e| InfraError::ConnectionFailed {
                service: "postgres",
                details: format!("invalid ssl mode '{}': {e}", self.ssl_mode),
            })?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode))
    }

    fn pool_options(&self) -> PgPoolOptions {
        let mut options = PgPoolOptions::new();
        if self.max_open_conns > 0 {
            options = options.max_connections(self.max_open_conns);
        }
        if self.max_idle_conns > 0 {
            let idle = match self.max_open_conns {
                0 => self.max_idle_conns,
                max => self.max_idle_conns.min(max),
            };
            options = options.min_connections(idle);
        }
        if self.conn_max_lifetime_secs > 0 {
            options = options.max_lifetime(Duration::from_secs(self.conn_max_lifetime_secs));
        }
        if self.conn_max_idle_time_secs > 0 {
            options = options.idle_timeout(Duration::from_secs(self.conn_max_idle_time_secs));
        }
        options
    }
}

/// Opens a PostgreSQL pool and verifies it with a first connection.
///
/// # Errors
///
/// Returns `ConnectionFailed` if the options are invalid or the server
/// cannot be reached.
#[tracing::instrument(skip_all, fields(host = %config.host, database = %config.database))]
pub async fn connect_postgres(config: &DatabaseConfig) -> Result<PgPool, Report<InfraError>> {
    let options = config.connect_options()?;

    let pool = config
        .pool_options()
        .connect_with(options)
        .await
        .map_err(|e| InfraError::ConnectionFailed {
            service: "postgres",
            details: e.to_string(),
        })?;

    tracing::info!("Connected to PostgreSQL");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_has_correct_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.ssl_mode, "disable");
        assert_eq!(config.max_open_conns, 100);
        assert_eq!(config.max_idle_conns, 10);
    }

    #[test]
    fn rejects_unknown_ssl_mode() {
        let config = DatabaseConfig {
            ssl_mode: "sometimes".to_string(),
            ..DatabaseConfig::default()
        };
        let err = config.connect_options().unwrap_err();
        assert!(matches!(err, InfraError::ConnectionFailed { service: "postgres", .. }));
    }

    #[test]
    fn zero_limits_keep_pool_defaults() {
        let config = DatabaseConfig {
            max_open_conns: 0,
            max_idle_conns: 0,
            conn_max_lifetime_secs: 0,
            conn_max_idle_time_secs: 0,
            ..DatabaseConfig::default()
        };
        let defaults = PgPoolOptions::new();
        let options = config.pool_options();
        assert_eq!(options.get_max_connections(), defaults.get_max_connections());
        assert_eq!(options.get_min_connections(), defaults.get_min_connections());
        assert_eq!(options.get_max_lifetime(), defaults.get_max_lifetime());
    }

    #[test]
    fn limits_are_applied() {
        let options = DatabaseConfig::default().pool_options();
        assert_eq!(options.get_max_connections(), 100);
        assert_eq!(options.get_min_connections(), 10);
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(600)));
    }
}
