//! HTTP handlers.
//!
//! The user handlers validate input, forward to the user service over
//! [`UserRpc`](usergate_user_rpc::UserRpc) and wrap the reply in an
//! [`ApiResponse`]. Business rules live in the service only.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tonic::Status;
use usergate_core::Error;
use usergate_user_rpc::proto::{
    CreateUserReq, CreateUserResp, DeleteUserReq, DeleteUserResp, GetUserReq, GetUserResp,
    GetUsersReq, GetUsersResp, UpdateUserReq, UpdateUserResp,
};
use usergate_user_rpc::status::error_from_status;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::error::ApiError;
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(message: &str, data: T) -> Self {
        Self {
            code: 200,
            message: message.to_string(),
            data,
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
}

/// Partial update. An empty or omitted field is left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub name: String,
}

fn optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message("must be a valid email address".into()))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
}

/// Renders validation failures as one readable line, fields in name order.
fn validation_details(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let rule = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("failed validation rule: {}", error.code),
                };
                format!("Field '{field}' failed validation: {rule}")
            })
        })
        .collect();

    format!("validation failed: {}", messages.join("; "))
}

fn validate(payload: &impl Validate) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError(Error::bad_request().with_details(validation_details(&e))))
}

fn rpc_error(status: Status) -> ApiError {
    ApiError(error_from_status(&status))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(caller): CurrentIdentity,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<CreateUserResp> {
    let Json(payload) = payload?;
    validate(&payload)?;

    let created = state
        .users
        .create_user(CreateUserReq {
            email: payload.email,
            name: payload.name,
        })
        .await
        .map_err(rpc_error)?;

    tracing::info!(actor = %caller.sub, user_id = created.id, "user created");
    Ok(Json(ApiResponse::ok("User created successfully", created)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<GetUserResp> {
    let Path(id) = id?;
    let user = state
        .users
        .get_user(GetUserReq { id })
        .await
        .map_err(rpc_error)?;
    Ok(Json(ApiResponse::ok("Success", user)))
}

pub async fn get_users(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<GetUsersResp> {
    let Query(query) = query?;
    let page = state
        .users
        .get_users(GetUsersReq {
            page: query.page,
            page_size: query.page_size,
        })
        .await
        .map_err(rpc_error)?;
    Ok(Json(ApiResponse::ok("Success", page)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(caller): CurrentIdentity,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<UpdateUserResp> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    validate(&payload)?;

    let updated = state
        .users
        .update_user(UpdateUserReq {
            id,
            email: payload.email,
            name: payload.name,
        })
        .await
        .map_err(rpc_error)?;

    tracing::info!(actor = %caller.sub, user_id = id, "user updated");
    Ok(Json(ApiResponse::ok("User updated successfully", updated)))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(caller): CurrentIdentity,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<DeleteUserResp> {
    let Path(id) = id?;
    let deleted = state
        .users
        .delete_user(DeleteUserReq { id })
        .await
        .map_err(rpc_error)?;

    tracing::info!(actor = %caller.sub, user_id = id, "user deleted");
    Ok(Json(ApiResponse::ok("User deleted successfully", deleted)))
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub dependencies: BTreeMap<&'static str, &'static str>,
}

/// Liveness plus reachability of the optional cache and broker.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthReport>> {
    let mut dependencies = BTreeMap::new();
    let mut healthy = true;

    if let Some(cache) = &state.cache {
        let up = cache.ping().await.is_ok();
        healthy &= up;
        dependencies.insert("cache", if up { "up" } else { "down" });
    }
    if let Some(broker) = &state.broker {
        let up = broker.is_connected();
        healthy &= up;
        dependencies.insert("broker", if up { "up" } else { "down" });
    }

    let status = if healthy { "healthy" } else { "degraded" };
    Json(ApiResponse::ok(
        "OK",
        HealthReport {
            status,
            dependencies,
        },
    ))
}
