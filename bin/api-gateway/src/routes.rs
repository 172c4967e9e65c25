//! Route table.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::require_auth;
use crate::state::AppState;

/// Builds the gateway router.
///
/// `/health` is public. Every `/api/v1/users` route requires a valid
/// bearer token. A request still running after `request_timeout` is
/// answered with 408.
pub fn router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let users = Router::new()
        .route(
            "/api/v1/users",
            get(handlers::get_users).post(handlers::create_user),
        )
        .route(
            "/api/v1/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(users)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
