//! The `user.User` service contract.

use async_trait::async_trait;
use tonic::Status;

use crate::proto::{
    CreateUserReq, CreateUserResp, DeleteUserReq, DeleteUserResp, GetUserReq, GetUserResp,
    GetUsersReq, GetUsersResp, UpdateUserReq, UpdateUserResp,
};

/// The five unary user operations.
///
/// Failures are gRPC statuses produced by
/// [`status_from_error`](crate::status::status_from_error), so the caller can
/// recover the same taxonomy value with
/// [`error_from_status`](crate::status::error_from_status).
#[async_trait]
pub trait UserRpc: Send + Sync + 'static {
    async fn create_user(&self, request: CreateUserReq) -> Result<CreateUserResp, Status>;

    async fn get_user(&self, request: GetUserReq) -> Result<GetUserResp, Status>;

    async fn get_users(&self, request: GetUsersReq) -> Result<GetUsersResp, Status>;

    async fn update_user(&self, request: UpdateUserReq) -> Result<UpdateUserResp, Status>;

    async fn delete_user(&self, request: DeleteUserReq) -> Result<DeleteUserResp, Status>;
}
