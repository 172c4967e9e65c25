//! RPC transport logic: `user.User` records in, use-case calls, records out.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tonic::Status;
use usergate_user_rpc::UserRpc;
use usergate_user_rpc::proto::{
    CreateUserReq, CreateUserResp, DeleteUserReq, DeleteUserResp, GetUserReq, GetUserResp,
    GetUsersReq, GetUsersResp, UpdateUserReq, UpdateUserResp,
};
use usergate_user_rpc::status::to_rpc_status;

use crate::entity::User;
use crate::usecase::UserUsecase;

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn user_record(user: User) -> GetUserResp {
    GetUserResp {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: timestamp(user.created_at),
        updated_at: timestamp(user.updated_at),
    }
}

/// Serves [`UserRpc`] in-process on top of the use-case layer.
#[derive(Clone)]
pub struct UserLogic {
    users: Arc<UserUsecase>,
}

impl UserLogic {
    pub fn new(users: Arc<UserUsecase>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserRpc for UserLogic {
    async fn create_user(&self, request: CreateUserReq) -> Result<CreateUserResp, Status> {
        let user = self
            .users
            .create_user(&request.email, &request.name)
            .await
            .map_err(|e| to_rpc_status(&e))?;

        Ok(CreateUserResp {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: timestamp(user.created_at),
        })
    }

    async fn get_user(&self, request: GetUserReq) -> Result<GetUserResp, Status> {
        let user = self
            .users
            .get_user(request.id)
            .await
            .map_err(|e| to_rpc_status(&e))?;
        Ok(user_record(user))
    }

    async fn get_users(&self, request: GetUsersReq) -> Result<GetUsersResp, Status> {
        let page = self
            .users
            .get_users(request.page, request.page_size)
            .await
            .map_err(|e| to_rpc_status(&e))?;

        Ok(GetUsersResp {
            users: page.users.into_iter().map(user_record).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    async fn update_user(&self, request: UpdateUserReq) -> Result<UpdateUserResp, Status> {
        let user = self
            .users
            .update_user(request.id, &request.email, &request.name)
            .await
            .map_err(|e| to_rpc_status(&e))?;

        Ok(UpdateUserResp {
            id: user.id,
            email: user.email,
            name: user.name,
            updated_at: timestamp(user.updated_at),
        })
    }

    async fn delete_user(&self, request: DeleteUserReq) -> Result<DeleteUserResp, Status> {
        self.users
            .delete_user(request.id)
            .await
            .map_err(|e| to_rpc_status(&e))?;
        Ok(DeleteUserResp { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;
    use tonic::Code;

    fn logic() -> UserLogic {
        let repo = Arc::new(InMemoryUserRepository::new());
        UserLogic::new(Arc::new(UserUsecase::new(repo)))
    }

    #[tokio::test]
    async fn create_then_get_round_trips_records() {
        let logic = logic();
        let created = logic
            .create_user(CreateUserReq {
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            })
            .await
            .unwrap();

        let fetched = logic.get_user(GetUserReq { id: created.id }).await.unwrap();
        assert_eq!(fetched.email, "ada@example.com");
        assert_eq!(fetched.created_at, created.created_at);
        assert!(DateTime::parse_from_rfc3339(&fetched.updated_at).is_ok());
    }

    #[tokio::test]
    async fn errors_become_mapped_statuses() {
        let logic = logic();

        let status = logic.get_user(GetUserReq { id: 1 }).await.unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Resource not found");
        assert_eq!(status.details(), b"User not found");

        let req = CreateUserReq {
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
        };
        logic.create_user(req.clone()).await.unwrap();
        let status = logic.create_user(req).await.unwrap_err();
        assert_eq!(status.code(), Code::AlreadyExists);
    }

    #[tokio::test]
    async fn get_users_returns_effective_paging() {
        let logic = logic();
        let page = logic
            .get_users(GetUsersReq {
                page: 0,
                page_size: 5000,
            })
            .await
            .unwrap();

        assert_eq!((page.page, page.page_size), (1, 100));
        assert_eq!(page.total, 0);

        let page = logic
            .get_users(GetUsersReq {
                page: 3_000_000_000,
                page_size: 3_000_000_000,
            })
            .await
            .unwrap();
        assert_eq!((page.page, page.page_size), (3_000_000_000, 100));
        assert!(page.users.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_success() {
        let logic = logic();
        let created = logic
            .create_user(CreateUserReq {
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            })
            .await
            .unwrap();

        let deleted = logic
            .delete_user(DeleteUserReq { id: created.id })
            .await
            .unwrap();
        assert!(deleted.success);

        let status = logic
            .delete_user(DeleteUserReq { id: created.id })
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }
}
