//! Identity provider configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the OpenID Connect identity provider.
///
/// Loaded from `OIDC__*` environment variables by the binaries. Fields with
/// defaults can be omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// Base URL of the provider (e.g. "https://auth.example.com").
    /// The userinfo and token endpoints are resolved relative to it.
    issuer: String,
    /// OAuth2 client ID used for the client-credentials grant.
    client_id: String,
    /// OAuth2 client secret used for the client-credentials grant.
    client_secret: String,
    /// Scopes requested for service tokens, as a comma-separated string.
    /// Default: "openid,profile,email"
    #[serde(default = "default_scopes")]
    scopes: String,
    /// Upper bound on a single provider round trip, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_scopes() -> String {
    "openid,profile,email".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl OidcConfig {
    /// Creates a new configuration with defaults for optional fields.
    #[must_use]
    pub fn new(issuer: String, client_id: String, client_secret: String) -> Self {
        Self {
            issuer,
            client_id,
            client_secret,
            scopes: default_scopes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Returns the issuer base URL without a trailing slash.
    #[must_use]
    pub fn issuer(&self) -> &str {
        self.issuer.trim_end_matches('/')
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the scopes to request, parsed from the comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_defaults() {
        let config = OidcConfig::new(
            "https://auth.example.com".to_string(),
            "client-id".to_string(),
            "client-secret".to_string(),
        );

        assert_eq!(config.issuer(), "https://auth.example.com");
        assert_eq!(config.client_id(), "client-id");
        assert_eq!(config.client_secret(), "client-secret");
        assert_eq!(config.scopes(), vec!["openid", "profile", "email"]);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn issuer_drops_trailing_slash() {
        let config = OidcConfig::new(
            "https://auth.example.com/".to_string(),
            "id".to_string(),
            "secret".to_string(),
        );
        assert_eq!(config.issuer(), "https://auth.example.com");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{
            "issuer": "https://auth.example.com",
            "client_id": "my-client",
            "client_secret": "secret"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.scopes(), vec!["openid", "profile", "email"]);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn scopes_parses_comma_separated() {
        let json = r#"{
            "issuer": "https://auth.example.com",
            "client_id": "my-client",
            "client_secret": "secret",
            "scopes": "openid, email,,profile"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
    }
}
