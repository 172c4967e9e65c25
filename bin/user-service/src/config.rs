//! User service configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys (e.g. `DATABASE__HOST`, `REPOSITORY__BACKEND`).

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use usergate_infra::{BrokerConfig, DatabaseConfig};

use crate::repository::RowDecodePolicy;

#[derive(Debug, Deserialize)]
pub struct UserServiceConfig {
    /// Address the RPC server listens on.
    #[serde(default = "default_listen_on")]
    pub listen_on: SocketAddr,

    /// Deadline for a single RPC, in milliseconds.
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Broker for lifecycle events. Events are disabled when absent.
    #[serde(default)]
    pub broker: Option<BrokerConfig>,
}

fn default_listen_on() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9000))
}

fn default_rpc_timeout_ms() -> u64 {
    5000
}

/// Which store backs the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryBackend {
    #[default]
    Postgres,
    /// Process-local store for local development; data is lost on exit.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub backend: RepositoryBackend,

    /// Upper bound on a single store round trip, in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default)]
    pub row_decode_policy: RowDecodePolicy,
}

fn default_query_timeout_ms() -> u64 {
    3000
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            backend: RepositoryBackend::default(),
            query_timeout_ms: default_query_timeout_ms(),
            row_decode_policy: RowDecodePolicy::default(),
        }
    }
}

impl RepositoryConfig {
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl UserServiceConfig {
    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_config_has_correct_defaults() {
        let config = RepositoryConfig::default();
        assert_eq!(config.backend, RepositoryBackend::Postgres);
        assert_eq!(config.query_timeout(), Duration::from_secs(3));
        assert_eq!(config.row_decode_policy, RowDecodePolicy::Skip);
    }

    #[test]
    fn empty_input_uses_defaults() {
        let config: UserServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.listen_on, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.rpc_timeout(), Duration::from_secs(5));
        assert_eq!(config.database.port, 5432);
        assert!(config.broker.is_none());
    }

    #[test]
    fn nested_sections_deserialize() {
        let json = r#"{
            "listen_on": "127.0.0.1:9100",
            "repository": { "backend": "memory", "row_decode_policy": "fail_fast" },
            "broker": { "host": "nats.internal" }
        }"#;
        let config: UserServiceConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.listen_on.port(), 9100);
        assert_eq!(config.repository.backend, RepositoryBackend::Memory);
        assert_eq!(config.repository.row_decode_policy, RowDecodePolicy::FailFast);
        assert_eq!(config.broker.unwrap().port, 4222);
    }
}
