//! Serves a [`UserRpc`] implementation through the generated `user.User`
//! server.

use tonic::{Request, Response, Status};

use crate::proto::user_server::{User, UserServer};
use crate::proto::{
    CreateUserReq, CreateUserResp, DeleteUserReq, DeleteUserResp, GetUserReq, GetUserResp,
    GetUsersReq, GetUsersResp, UpdateUserReq, UpdateUserResp,
};
use crate::service::UserRpc;

/// Adapts [`UserRpc`] to the generated server trait.
#[derive(Debug)]
pub struct UserRpcService<T> {
    inner: T,
}

impl<T: UserRpc> UserRpcService<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

/// Builds the tonic service for `rpc`, ready for `Server::add_service`.
pub fn user_server<T: UserRpc>(rpc: T) -> UserServer<UserRpcService<T>> {
    UserServer::new(UserRpcService::new(rpc))
}

#[tonic::async_trait]
impl<T: UserRpc> User for UserRpcService<T> {
    async fn create_user(
        &self,
        request: Request<CreateUserReq>,
    ) -> Result<Response<CreateUserResp>, Status> {
        self.inner
            .create_user(request.into_inner())
            .await
            .map(Response::new)
    }

    async fn get_user(&self, request: Request<GetUserReq>) -> Result<Response<GetUserResp>, Status> {
        self.inner.get_user(request.into_inner()).await.map(Response::new)
    }

    async fn get_users(
        &self,
        request: Request<GetUsersReq>,
    ) -> Result<Response<GetUsersResp>, Status> {
        self.inner.get_users(request.into_inner()).await.map(Response::new)
    }

    async fn update_user(
        &self,
        request: Request<UpdateUserReq>,
    ) -> Result<Response<UpdateUserResp>, Status> {
        self.inner
            .update_user(request.into_inner())
            .await
            .map(Response::new)
    }

    async fn delete_user(
        &self,
        request: Request<DeleteUserReq>,
    ) -> Result<Response<DeleteUserResp>, Status> {
        self.inner
            .delete_user(request.into_inner())
            .await
            .map(Response::new)
    }
}
