//! Caller identity as reported by the identity provider.

use serde::{Deserialize, Serialize};

/// Claims about the caller, decoded from the provider's userinfo response.
///
/// Built fresh for every validated request and never cached. Every claim may
/// be omitted by the provider and decodes to its empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject identifier, unique per provider.
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub roles: Vec<String>,
}
