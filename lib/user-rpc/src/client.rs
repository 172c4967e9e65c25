//! Network client for the `user.User` service.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::{Response, Status};

use crate::proto::user_client::UserClient;
use crate::proto::{
    CreateUserReq, CreateUserResp, DeleteUserReq, DeleteUserResp, GetUserReq, GetUserResp,
    GetUsersReq, GetUsersResp, UpdateUserReq, UpdateUserResp,
};
use crate::service::UserRpc;

/// Errors constructing a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    InvalidEndpoint { endpoint: String, details: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoint { endpoint, details } => {
                write!(f, "invalid user service endpoint '{endpoint}': {details}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// gRPC client for the user service.
///
/// Connects lazily, so construction succeeds while the service is still
/// starting. Every call is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct UserRpcClient {
    inner: UserClient<Channel>,
}

impl UserRpcClient {
    /// Creates a client for `endpoint` (e.g. "http://localhost:9000").
    ///
    /// # Errors
    ///
    /// Returns `InvalidEndpoint` if the endpoint is not a valid URI.
    pub fn connect_lazy(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        let channel = Endpoint::from_shared(endpoint.to_string())
            .map_err(|e| ClientError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                details: e.to_string(),
            })?
            .connect_timeout(timeout)
            .timeout(timeout)
            .connect_lazy();

        Ok(Self {
            inner: UserClient::new(channel),
        })
    }
}

// The generated client needs `&mut self`; clones share one channel.
#[async_trait]
impl UserRpc for UserRpcClient {
    async fn create_user(&self, request: CreateUserReq) -> Result<CreateUserResp, Status> {
        let mut client = self.inner.clone();
        client.create_user(request).await.map(Response::into_inner)
    }

    async fn get_user(&self, request: GetUserReq) -> Result<GetUserResp, Status> {
        let mut client = self.inner.clone();
        client.get_user(request).await.map(Response::into_inner)
    }

    async fn get_users(&self, request: GetUsersReq) -> Result<GetUsersResp, Status> {
        let mut client = self.inner.clone();
        client.get_users(request).await.map(Response::into_inner)
    }

    async fn update_user(&self, request: UpdateUserReq) -> Result<UpdateUserResp, Status> {
        let mut client = self.inner.clone();
        client.update_user(request).await.map(Response::into_inner)
    }

    async fn delete_user(&self, request: DeleteUserReq) -> Result<DeleteUserResp, Status> {
        let mut client = self.inner.clone();
        client.delete_user(request).await.map(Response::into_inner)
    }
}
