//! Service wiring: builds the repository, publisher and use-case from config.

use std::sync::Arc;
use usergate_core::Result;
use usergate_infra::{BrokerClient, InfraError, connect_postgres};

use crate::config::{RepositoryBackend, UserServiceConfig};
use crate::events::BrokerEventPublisher;
use crate::logic::UserLogic;
use crate::repository::{InMemoryUserRepository, PgUserRepository, UserRepository};
use crate::usecase::UserUsecase;

/// Long-lived dependencies shared by every request.
pub struct ServiceContext {
    users: Arc<UserUsecase>,
}

impl ServiceContext {
    /// Connects to the configured store and broker and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency is unreachable or migrations fail.
    pub async fn new(config: &UserServiceConfig) -> Result<Self, InfraError> {
        let repo: Arc<dyn UserRepository> = match config.repository.backend {
            RepositoryBackend::Postgres => {
                let pool = connect_postgres(&config.database).await?;

                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| InfraError::CommandFailed {
                        service: "postgres",
                        details: format!("migration failed: {e}"),
                    })?;

                Arc::new(PgUserRepository::new(
                    pool,
                    config.repository.query_timeout(),
                    config.repository.row_decode_policy,
                ))
            }
            RepositoryBackend::Memory => {
                tracing::warn!("Using in-memory user repository; data will not persist");
                Arc::new(InMemoryUserRepository::new())
            }
        };

        let mut users = UserUsecase::new(repo);
        match &config.broker {
            Some(broker) => {
                let broker = BrokerClient::connect(broker).await?;
                users = users.with_events(Arc::new(BrokerEventPublisher::new(broker)));
            }
            None => tracing::info!("No broker configured; lifecycle events disabled"),
        }

        Ok(Self {
            users: Arc::new(users),
        })
    }

    /// RPC logic over the shared use-case.
    #[must_use]
    pub fn logic(&self) -> UserLogic {
        UserLogic::new(Arc::clone(&self.users))
    }
}
