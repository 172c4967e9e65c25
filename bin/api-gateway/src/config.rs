//! Gateway configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys (e.g. `OIDC__ISSUER`, `USER_RPC__ENDPOINT`).

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use usergate_identity::OidcConfig;
use usergate_infra::{BrokerConfig, CacheConfig};

#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on handling a single HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    pub oidc: OidcConfig,

    #[serde(default)]
    pub user_rpc: UserRpcConfig,

    /// Reported by the health endpoint when present.
    #[serde(default)]
    pub cache: Option<CacheConfig>,

    /// Reported by the health endpoint when present.
    #[serde(default)]
    pub broker: Option<BrokerConfig>,
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8888
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Where the user service is reached.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRpcConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-call deadline, in milliseconds.
    #[serde(default = "default_rpc_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_rpc_timeout_ms() -> u64 {
    5000
}

impl Default for UserRpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_rpc_timeout_ms(),
        }
    }
}

impl UserRpcConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl GatewayConfig {
    #[must_use]
    pub fn listen_on(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `OIDC__*` is missing or a variable is invalid.
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

    const OIDC: &str = r#""oidc": {
        "issuer": "https://auth.example.com",
        "client_id": "gateway",
        "client_secret": "secret"
    }"#;

    #[test]
    fn defaults_apply_when_only_oidc_is_given() {
        let json = format!("{{ {OIDC} }}");
        let config: GatewayConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.listen_on(), "0.0.0.0:8888".parse().unwrap());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.user_rpc.endpoint, "http://localhost:9000");
        assert_eq!(config.user_rpc.timeout(), Duration::from_secs(5));
        assert!(config.cache.is_none());
        assert!(config.broker.is_none());
    }

    #[test]
    fn oidc_section_is_required() {
        let result: Result<GatewayConfig, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn optional_dependencies_deserialize() {
        let json = format!(
            r#"{{ {OIDC}, "port": 8080,
                "user_rpc": {{ "endpoint": "http://users:9000" }},
                "cache": {{ "host": "redis" }} }}"#
        );
        let config: GatewayConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.user_rpc.endpoint, "http://users:9000");
        assert_eq!(config.user_rpc.timeout_ms, 5000);
        assert_eq!(config.cache.unwrap().port, 6379);
    }
}
