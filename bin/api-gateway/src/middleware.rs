//! Bearer-token authentication.
//!
//! [`require_auth`] guards protected routes and [`optional_auth`] serves
//! routes that stay reachable anonymously. On success both attach the
//! caller to the request as three distinct extensions: [`Subject`],
//! [`UserEmail`] and the full [`Identity`].

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use usergate_core::Error;
use usergate_identity::{Identity, extract_token};

use crate::error::ApiError;
use crate::state::AppState;

/// The caller's subject identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(pub String);

/// The caller's email address as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEmail(pub String);

/// Validates a token already pulled from the request. Only the owned token
/// is held across the await; the request itself must not be.
async fn resolve(state: &AppState, token: Option<String>) -> Result<Identity, Error> {
    let Some(token) = token else {
        return Err(Error::unauthorized());
    };

    state.validator.validate_token(&token).await.map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        Error::unauthorized().with_details("Invalid or expired token")
    })
}

fn attach(request: &mut Request, identity: Identity) {
    let extensions = request.extensions_mut();
    extensions.insert(Subject(identity.sub.clone()));
    extensions.insert(UserEmail(identity.email.clone()));
    extensions.insert(identity);
}

/// Rejects the request with 401 unless it carries a valid bearer token.
///
/// `next` is only invoked for authenticated requests.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_token(request.headers(), request.uri());
    match resolve(&state, token).await {
        Ok(identity) => {
            attach(&mut request, identity);
            next.run(request).await
        }
        Err(error) => ApiError(error).into_response(),
    }
}

/// Attaches the caller when a valid token is present and never rejects.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_token(request.headers(), request.uri());
    if let Ok(identity) = resolve(&state, token).await {
        attach(&mut request, identity);
    }
    next.run(request).await
}

/// Extractor for the identity attached by the auth middleware.
///
/// Rejects with 401 when the request went through no auth layer or the
/// caller is anonymous.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| ApiError(Error::unauthorized()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, GOOD_TOKEN};
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Extension, Json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::util::ServiceExt;

    /// Router whose only handler echoes the attached identity and counts
    /// its invocations.
    fn app(optional: bool, calls: Arc<AtomicUsize>) -> Router {
        let state = testing::state();
        let handler = move |subject: Option<Extension<Subject>>,
                            email: Option<Extension<UserEmail>>,
                            identity: Option<Extension<Identity>>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Json(serde_json::json!({
                    "subject": subject.map(|Extension(Subject(s))| s),
                    "email": email.map(|Extension(UserEmail(e))| e),
                    "identity": identity.map(|Extension(i)| i),
                }))
            }
        };

        let router = Router::new().route("/echo", get(handler));
        let router = if optional {
            router.layer(axum::middleware::from_fn_with_state(state.clone(), optional_auth))
        } else {
            router.layer(axum::middleware::from_fn_with_state(state.clone(), require_auth))
        };
        router.with_state(state)
    }

    fn request(uri: &str, authorization: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_rejected_without_running_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = app(false, calls.clone())
            .oneshot(request("/echo", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = testing::body_json(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["status_code"], 401);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_with_details() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = app(false, calls.clone())
            .oneshot(request("/echo", Some("Bearer forged")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = testing::body_json(response).await;
        assert_eq!(body["details"], "Invalid or expired token");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_header_counts_as_absent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = app(false, calls.clone())
            .oneshot(request("/echo", Some(&format!("Bearer {GOOD_TOKEN} extra"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = testing::body_json(response).await;
        assert!(body.get("details").is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_token_attaches_all_three_slots() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = app(false, calls.clone())
            .oneshot(request("/echo", Some(&format!("bearer {GOOD_TOKEN}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = testing::body_json(response).await;
        assert_eq!(body["subject"], "user-1");
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["identity"], serde_json::to_value(testing::ada()).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn query_token_is_accepted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = app(false, calls.clone())
            .oneshot(request(&format!("/echo?token={GOOD_TOKEN}"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn optional_auth_always_reaches_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));

        for authorization in [None, Some("Bearer forged"), Some("Basic abc")] {
            let response = app(true, calls.clone())
                .oneshot(request("/echo", authorization))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = testing::body_json(response).await;
            assert!(body["identity"].is_null());
            assert!(body["subject"].is_null());
        }

        let response = app(true, calls.clone())
            .oneshot(request("/echo", Some(&format!("Bearer {GOOD_TOKEN}"))))
            .await
            .unwrap();
        let body = testing::body_json(response).await;
        assert_eq!(body["subject"], "user-1");

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn current_identity_requires_an_attached_identity() {
        let handler = |CurrentIdentity(identity): CurrentIdentity| async move { identity.sub };
        let response = Router::new()
            .route("/me", get(handler))
            .oneshot(request("/me", Some(&format!("Bearer {GOOD_TOKEN}"))))
            .await
            .unwrap();

        // No auth layer in front, so nothing was attached.
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
