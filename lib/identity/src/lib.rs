//! Identity resolution for usergate.
//!
//! Bearer tokens are opaque to usergate: they are validated by delegating to
//! an external OpenID Connect provider's userinfo endpoint, which answers
//! with the caller's [`Identity`]. This crate provides:
//!
//! - [`extract_token`]: pulls a bearer token out of request headers or query
//! - [`IdentityProviderClient`]: the HTTP client for the provider
//! - [`TokenValidator`]: the seam the HTTP gateway depends on

pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod token;

pub use client::{IdentityProviderClient, TokenValidator};
pub use config::OidcConfig;
pub use error::AuthError;
pub use identity::Identity;
pub use token::{ServiceToken, extract_token};
