//! HTTP client for the OpenID Connect identity provider.

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{ClientId, ClientSecret, Scope, TokenResponse, TokenUrl};
use reqwest::StatusCode;
use url::Url;

use crate::config::OidcConfig;
use crate::error::AuthError;
use crate::identity::Identity;
use crate::token::ServiceToken;

const USERINFO_PATH: &str = "/oidc/v1/userinfo";
const TOKEN_PATH: &str = "/oauth/v2/token";

/// Resolves a bearer token into an [`Identity`].
///
/// The HTTP gateway depends on this trait rather than on the concrete
/// client so tests can substitute a fake provider.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validates `token` and returns the caller's identity.
    async fn validate_token(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Client for the identity provider's userinfo and token endpoints.
///
/// Holds no state beyond the issuer and credentials. Every round trip is
/// bounded by the configured request timeout, and no call is retried.
#[derive(Debug, Clone)]
pub struct IdentityProviderClient {
    http: reqwest::Client,
    config: OidcConfig,
}

impl IdentityProviderClient {
    /// Creates a client for the configured provider.
    ///
    /// # Errors
    ///
    /// Returns `TransportFailure` if the HTTP client cannot be built.
    pub fn new(config: OidcConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::TransportFailure {
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { http, config })
    }

    /// Returns the provider configuration.
    #[must_use]
    pub fn config(&self) -> &OidcConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        Url::parse(&format!("{}{path}", self.config.issuer())).map_err(|e| {
            AuthError::TransportFailure {
                reason: format!("invalid issuer URL '{}': {e}", self.config.issuer()),
            }
        })
    }

    /// Fetches a service-to-service token with the client-credentials grant.
    ///
    /// # Errors
    ///
    /// Returns `TransportFailure` on any network or protocol error.
    #[tracing::instrument(skip(self))]
    pub async fn client_credentials_token(&self) -> Result<ServiceToken, AuthError> {
        let token_url = TokenUrl::from_url(self.endpoint(TOKEN_PATH)?);

        let client = BasicClient::new(ClientId::new(self.config.client_id().to_string()))
            .set_client_secret(ClientSecret::new(self.config.client_secret().to_string()))
            .set_token_uri(token_url);

        let mut request = client.exchange_client_credentials();
        for scope in self.config.scopes() {
            request = request.add_scope(Scope::new(scope.to_string()));
        }

        let response =
            request
                .request_async(&self.http)
                .await
                .map_err(|e| AuthError::TransportFailure {
                    reason: format!("client credentials exchange failed: {e}"),
                })?;

        Ok(ServiceToken {
            access_token: response.access_token().secret().clone(),
            expires_in: response.expires_in(),
            scopes: response
                .scopes()
                .map(|scopes| scopes.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default(),
        })
    }
}

#[async_trait]
impl TokenValidator for IdentityProviderClient {
    #[tracing::instrument(skip_all)]
    async fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        let token = token.trim_start();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken {
                reason: "empty token".to_string(),
            });
        }

        let url = self.endpoint(USERINFO_PATH)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::TransportFailure {
                reason: format!("userinfo request failed: {e}"),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(%status, "identity provider rejected token");
            return Err(AuthError::InvalidToken {
                reason: format!("userinfo returned {status}"),
            });
        }

        response
            .json::<Identity>()
            .await
            .map_err(|e| AuthError::TransportFailure {
                reason: format!("failed to decode userinfo response: {e}"),
            })
    }
}
