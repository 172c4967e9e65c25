//! Fixtures shared by the gateway's unit tests.

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::Request;
use axum::response::Response;
use std::sync::Arc;
use usergate_identity::{AuthError, Identity, TokenValidator};
use usergate_user_service::logic::UserLogic;
use usergate_user_service::repository::InMemoryUserRepository;
use usergate_user_service::usecase::UserUsecase;

use crate::state::AppState;

pub const GOOD_TOKEN: &str = "good-token";

/// Accepts exactly [`GOOD_TOKEN`].
pub struct StaticValidator;

pub fn ada() -> Identity {
    Identity {
        sub: "user-1".to_string(),
        email: "ada@example.com".to_string(),
        email_verified: true,
        name: "Ada Lovelace".to_string(),
        given_name: "Ada".to_string(),
        family_name: "Lovelace".to_string(),
        picture: String::new(),
        roles: vec!["admin".to_string()],
    }
}

#[async_trait]
impl TokenValidator for StaticValidator {
    async fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        if token == GOOD_TOKEN {
            Ok(ada())
        } else {
            Err(AuthError::InvalidToken {
                reason: "unknown token".to_string(),
            })
        }
    }
}

/// Gateway state over the real user logic and an in-memory store.
pub fn state() -> Arc<AppState> {
    let repo = Arc::new(InMemoryUserRepository::new());
    let users = UserLogic::new(Arc::new(UserUsecase::new(repo)));
    Arc::new(AppState::new(Arc::new(StaticValidator), Arc::new(users)))
}

pub fn authorized(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {GOOD_TOKEN}"));
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
