//! The persisted user entity.

use chrono::{DateTime, Utc};

/// A user row.
///
/// `id` is zero until the store assigns one on creation and never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates an unsaved user with both timestamps set to `now`.
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            email: email.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
