//! Bearer token extraction and service tokens.

use http::{HeaderMap, Uri, header::AUTHORIZATION};
use std::time::Duration;

/// Query parameter consulted when no usable `Authorization` header is present.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Pulls a bearer token out of a request.
///
/// The `Authorization` header wins when it has exactly two
/// whitespace-separated parts and the first is `bearer` in any case.
/// Otherwise the `token` query parameter is used. Returns `None` when
/// neither yields a non-empty token.
#[must_use]
pub fn extract_token(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_from_header)
    {
        return Some(token);
    }

    uri.query().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == TOKEN_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty())
    })
}

fn bearer_from_header(value: &str) -> Option<String> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Some((*token).to_string()),
        _ => None,
    }
}

/// A service-to-service access token from the client-credentials grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceToken {
    pub access_token: String,
    pub expires_in: Option<Duration>,
    pub scopes: Vec<String>,
}
