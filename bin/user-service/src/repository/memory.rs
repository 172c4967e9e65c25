//! In-memory user repository.
//!
//! Enforces the same unique-email constraint as the PostgreSQL schema, so
//! the use-case layer behaves identically against either store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use super::{RepoError, UserRepository, page_offset};
use crate::entity::User;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, User>,
    last_id: i64,
}

impl Table {
    fn email_taken(&self, email: &str, except: i64) -> bool {
        self.rows
            .values()
            .any(|user| user.email == email && user.id != except)
    }
}

/// Repository backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_conflict() -> RepoError {
    RepoError::Conflict {
        reason: "email already exists".to_string(),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &mut User) -> Result<(), RepoError> {
        let mut table = self.table.lock().await;
        if table.email_taken(&user.email, 0) {
            return Err(email_conflict());
        }

        table.last_id += 1;
        user.id = table.last_id;
        table.rows.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<User, RepoError> {
        let table = self.table.lock().await;
        table.rows.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepoError> {
        let table = self.table.lock().await;
        table
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<(Vec<User>, i64), RepoError> {
        let table = self.table.lock().await;
        let total = i64::try_from(table.rows.len()).unwrap_or(i64::MAX);

        let mut users: Vec<&User> = table.rows.values().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let skip = usize::try_from(page_offset(page, page_size)).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(0);
        let page = users.into_iter().skip(skip).take(take).cloned().collect();

        Ok((page, total))
    }

    async fn update(&self, user: &User) -> Result<(), RepoError> {
        let mut table = self.table.lock().await;
        if !table.rows.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if table.email_taken(&user.email, user.id) {
            return Err(email_conflict());
        }

        if let Some(row) = table.rows.get_mut(&user.id) {
            row.email.clone_from(&user.email);
            row.name.clone_from(&user.name);
            row.updated_at = user.updated_at;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut table = self.table.lock().await;
        table.rows.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}
