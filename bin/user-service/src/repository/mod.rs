//! User persistence.
//!
//! [`UserRepository`] is the seam between the use-case layer and the store.
//! Each operation is a single round trip (listing does two: a count and a
//! page fetch). Raw driver errors never leave this module; they are logged
//! here and replaced by a [`RepoError`] with a sanitized reason.

mod memory;
mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

use crate::entity::User;

/// Errors from the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// No row matched.
    NotFound,
    /// A unique constraint rejected the write.
    Conflict { reason: String },
    /// The store could not complete the round trip in time, or at all.
    Unavailable { reason: String },
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "user not found"),
            Self::Conflict { reason } => write!(f, "conflict: {reason}"),
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for RepoError {}

/// What to do with a listed row that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowDecodePolicy {
    /// Log and leave the row out of the page.
    #[default]
    Skip,
    /// Fail the whole listing.
    FailFast,
}

/// CRUD over persisted users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts `user` and writes the store-assigned id back into it.
    async fn create(&self, user: &mut User) -> Result<(), RepoError>;

    async fn get_by_id(&self, id: i64) -> Result<User, RepoError>;

    async fn get_by_email(&self, email: &str) -> Result<User, RepoError>;

    /// Returns one page, newest first, and the unfiltered total row count.
    async fn list(&self, page: i64, page_size: i64) -> Result<(Vec<User>, i64), RepoError>;

    /// Writes email, name and `updated_at` for `user.id`.
    async fn update(&self, user: &User) -> Result<(), RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

/// Row offset of a 1-based page.
#[must_use]
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page - 1).max(0).saturating_mul(page_size)
}
