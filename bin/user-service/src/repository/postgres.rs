//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::future::Future;
use std::time::Duration;

use super::{RepoError, RowDecodePolicy, UserRepository, page_offset};
use crate::entity::User;

/// Row type for user queries.
#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for user rows in PostgreSQL.
///
/// Every round trip is bounded by `query_timeout`; a timeout drops the
/// in-flight query and surfaces as `Unavailable`.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    query_timeout: Duration,
    decode_policy: RowDecodePolicy,
}

impl PgUserRepository {
    pub fn new(pool: PgPool, query_timeout: Duration, decode_policy: RowDecodePolicy) -> Self {
        Self {
            pool,
            query_timeout,
            decode_policy,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(classify(operation, e)),
            Err(_) => {
                tracing::warn!(operation, timeout = ?self.query_timeout, "store round trip timed out");
                Err(RepoError::Unavailable {
                    reason: format!("{operation} timed out"),
                })
            }
        }
    }
}

fn classify(operation: &'static str, error: sqlx::Error) -> RepoError {
    let unique_violation = error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique_violation {
        return RepoError::Conflict {
            reason: "email already exists".to_string(),
        };
    }

    match error {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        e => {
            tracing::error!(operation, error = %e, "store round trip failed");
            RepoError::Unavailable {
                reason: format!("{operation} failed"),
            }
        }
    }
}

/// Turns fetched rows into users, dropping or failing on undecodable rows
/// according to `policy`.
fn decode_rows<I>(rows: I, policy: RowDecodePolicy) -> Result<Vec<User>, RepoError>
where
    I: IntoIterator<Item = Result<UserRow, sqlx::Error>>,
{
    let mut users = Vec::new();
    for row in rows {
        match row {
            Ok(row) => users.push(User::from(row)),
            Err(e) => match policy {
                RowDecodePolicy::Skip => {
                    tracing::warn!(error = %e, "skipping undecodable user row");
                }
                RowDecodePolicy::FailFast => {
                    tracing::error!(error = %e, "undecodable user row");
                    return Err(RepoError::Unavailable {
                        reason: "list users failed".to_string(),
                    });
                }
            },
        }
    }
    Ok(users)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[tracing::instrument(skip_all)]
    async fn create(&self, user: &mut User) -> Result<(), RepoError> {
        let id: i64 = self
            .bounded(
                "create user",
                sqlx::query_scalar(
                    r#"
                    INSERT INTO users (email, name, created_at, updated_at)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(&user.email)
                .bind(&user.name)
                .bind(user.created_at)
                .bind(user.updated_at)
                .fetch_one(&self.pool),
            )
            .await?;

        user.id = id;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<User, RepoError> {
        let row: Option<UserRow> = self
            .bounded(
                "get user by id",
                sqlx::query_as(
                    r#"
                    SELECT id, email, name, created_at, updated_at
                    FROM users
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(User::from).ok_or(RepoError::NotFound)
    }

    #[tracing::instrument(skip_all)]
    async fn get_by_email(&self, email: &str) -> Result<User, RepoError> {
        let row: Option<UserRow> = self
            .bounded(
                "get user by email",
                sqlx::query_as(
                    r#"
                    SELECT id, email, name, created_at, updated_at
                    FROM users
                    WHERE email = $1
                    "#,
                )
                .bind(email)
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(User::from).ok_or(RepoError::NotFound)
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, page: i64, page_size: i64) -> Result<(Vec<User>, i64), RepoError> {
        let total: i64 = self
            .bounded(
                "count users",
                sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&self.pool),
            )
            .await?;

        let rows = self
            .bounded(
                "list users",
                sqlx::query(
                    r#"
                    SELECT id, email, name, created_at, updated_at
                    FROM users
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(page_size)
                .bind(page_offset(page, page_size))
                .fetch_all(&self.pool),
            )
            .await?;

        let users = decode_rows(rows.iter().map(|row| UserRow::from_row(row)), self.decode_policy)?;
        Ok((users, total))
    }

    #[tracing::instrument(skip_all, fields(id = user.id))]
    async fn update(&self, user: &User) -> Result<(), RepoError> {
        let result = self
            .bounded(
                "update user",
                sqlx::query(
                    r#"
                    UPDATE users
                    SET email = $1, name = $2, updated_at = $3
                    WHERE id = $4
                    "#,
                )
                .bind(&user.email)
                .bind(&user.name)
                .bind(user.updated_at)
                .bind(user.id)
                .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = self
            .bounded(
                "delete user",
                sqlx::query(
                    r#"
                    DELETE FROM users
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
