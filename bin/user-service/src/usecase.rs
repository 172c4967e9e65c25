//! User business rules.
//!
//! Repository failures are translated here into the shared error taxonomy;
//! nothing above this layer sees a [`RepoError`].
//!
//! The email pre-checks are a fast path for a readable message only. The
//! store's unique constraint is authoritative, and a violation it reports
//! is surfaced as the same `Conflict`.

use chrono::Utc;
use std::sync::Arc;
use usergate_core::Error;

use crate::entity::User;
use crate::events::{UserEvent, UserEventKind, UserEventPublisher};
use crate::repository::{RepoError, UserRepository};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

const EMAIL_EXISTS: &str = "User with this email already exists";
const EMAIL_TAKEN: &str = "Email already taken";
const USER_NOT_FOUND: &str = "User not found";

/// One page of users plus the effective paging parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Clamps paging input: `page < 1` becomes 1, `page_size < 1` becomes the
/// default, `page_size > MAX_PAGE_SIZE` becomes the maximum.
#[must_use]
pub fn clamp_paging(page: i64, page_size: i64) -> (i64, i64) {
    let page = page.max(1);
    let page_size = if page_size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size.min(MAX_PAGE_SIZE)
    };
    (page, page_size)
}

fn internal(error: &RepoError) -> Error {
    Error::internal().with_details(error.to_string())
}

fn not_found() -> Error {
    Error::not_found().with_details(USER_NOT_FOUND)
}

pub struct UserUsecase {
    repo: Arc<dyn UserRepository>,
    events: Option<Arc<dyn UserEventPublisher>>,
}

impl UserUsecase {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo, events: None }
    }

    /// Publishes lifecycle events to `events` after each successful mutation.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn UserEventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    async fn publish(&self, kind: UserEventKind, user: &User) {
        let Some(events) = &self.events else {
            return;
        };
        if let Err(e) = events.publish(&UserEvent::new(kind, user)).await {
            tracing::warn!(error = %e, subject = kind.subject(), id = user.id, "failed to publish user event");
        }
    }

    /// Creates a user with a fresh email.
    #[tracing::instrument(skip(self))]
    pub async fn create_user(&self, email: &str, name: &str) -> Result<User, Error> {
        match self.repo.get_by_email(email).await {
            Ok(_) => return Err(Error::conflict().with_details(EMAIL_EXISTS)),
            Err(RepoError::NotFound) => {}
            Err(e) => return Err(internal(&e)),
        }

        let mut user = User::new(email, name, Utc::now());
        self.repo.create(&mut user).await.map_err(|e| match e {
            RepoError::Conflict { .. } => Error::conflict().with_details(EMAIL_EXISTS),
            e => internal(&e),
        })?;

        tracing::info!(id = user.id, "user created");
        self.publish(UserEventKind::Created, &user).await;
        Ok(user)
    }

    /// Loads a user. Every repository failure reads as not found.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> Result<User, Error> {
        self.repo.get_by_id(id).await.map_err(|e| {
            if e != RepoError::NotFound {
                tracing::warn!(error = %e, "lookup failed");
            }
            not_found()
        })
    }

    /// Lists users newest first. Paging input is clamped before the query.
    #[tracing::instrument(skip(self))]
    pub async fn get_users(&self, page: i64, page_size: i64) -> Result<UserPage, Error> {
        let (page, page_size) = clamp_paging(page, page_size);
        let (users, total) = self
            .repo
            .list(page, page_size)
            .await
            .map_err(|e| internal(&e))?;

        Ok(UserPage {
            users,
            total,
            page,
            page_size,
        })
    }

    /// Updates email and/or name. An empty argument leaves that field as is.
    /// `updated_at` is refreshed even when nothing changed.
    #[tracing::instrument(skip(self))]
    pub async fn update_user(&self, id: i64, email: &str, name: &str) -> Result<User, Error> {
        let mut user = self.get_user(id).await?;

        if !email.is_empty() && email != user.email {
            match self.repo.get_by_email(email).await {
                Ok(other) if other.id != id => {
                    return Err(Error::conflict().with_details(EMAIL_TAKEN));
                }
                Ok(_) | Err(RepoError::NotFound) => {}
                Err(e) => return Err(internal(&e)),
            }
            user.email = email.to_string();
        }
        if !name.is_empty() {
            user.name = name.to_string();
        }
        user.updated_at = Utc::now();

        self.repo.update(&user).await.map_err(|e| match e {
            RepoError::NotFound => not_found(),
            RepoError::Conflict { .. } => Error::conflict().with_details(EMAIL_TAKEN),
            e => internal(&e),
        })?;

        self.publish(UserEventKind::Updated, &user).await;
        Ok(user)
    }

    /// Hard-deletes a user.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        let user = self.get_user(id).await?;

        // A concurrent delete between the check and here lands as NotFound.
        self.repo.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => not_found(),
            e => internal(&e),
        })?;

        tracing::info!(id, "user deleted");
        self.publish(UserEventKind::Deleted, &user).await;
        Ok(())
    }
}
