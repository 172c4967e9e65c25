//! User lifecycle events.
//!
//! Published after a create, update or delete has been committed.
//! Publishing is best effort and never changes the operation's outcome.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rootcause::prelude::Report;
use serde::Serialize;
use usergate_infra::{BrokerClient, InfraError};

use crate::entity::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEventKind {
    Created,
    Updated,
    Deleted,
}

impl UserEventKind {
    /// Broker subject the event is published on.
    #[must_use]
    pub fn subject(self) -> &'static str {
        match self {
            Self::Created => "users.created",
            Self::Updated => "users.updated",
            Self::Deleted => "users.deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEvent {
    pub kind: UserEventKind,
    pub id: i64,
    pub email: String,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

impl UserEvent {
    #[must_use]
    pub fn new(kind: UserEventKind, user: &User) -> Self {
        Self {
            kind,
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            occurred_at: Utc::now(),
        }
    }
}

/// Sink for lifecycle events.
#[async_trait]
pub trait UserEventPublisher: Send + Sync {
    async fn publish(&self, event: &UserEvent) -> Result<(), Report<InfraError>>;
}

/// Publishes events as JSON on the message broker.
#[derive(Debug, Clone)]
pub struct BrokerEventPublisher {
    broker: BrokerClient,
}

impl BrokerEventPublisher {
    pub fn new(broker: BrokerClient) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl UserEventPublisher for BrokerEventPublisher {
    async fn publish(&self, event: &UserEvent) -> Result<(), Report<InfraError>> {
        self.broker.publish_json(event.kind.subject(), event).await
    }
}
