//! Message broker client backed by NATS.
//!
//! Only core publish/subscribe is used. No streams or other server-side
//! topology are declared here.

use crate::error::InfraError;
use async_nats::connection::State;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "nats";

/// NATS connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    4222
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: String::new(),
            password: String::new(),
        }
    }
}

impl BrokerConfig {
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("nats://{}:{}", self.host, self.port)
    }
}

/// Shared handle to the broker.
#[derive(Debug, Clone)]
pub struct BrokerClient {
    client: async_nats::Client,
}

impl BrokerClient {
    /// Connects to the broker.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if the server cannot be reached or rejects
    /// the credentials.
    #[tracing::instrument(skip_all, fields(host = %config.host, port = config.port))]
    pub async fn connect(config: &BrokerConfig) -> Result<Self, Report<InfraError>> {
        let mut options = async_nats::ConnectOptions::new();
        if !config.user.is_empty() {
            options = options.user_and_password(config.user.clone(), config.password.clone());
        }

        let client = options
            .connect(config.server_address())
            .await
            .map_err(|e| InfraError::ConnectionFailed {
                service: SERVICE,
                details: e.to_string(),
            })?;

        tracing::info!("Connected to NATS");
        Ok(Self { client })
    }

    /// Publishes raw bytes on `subject`.
    pub async fn publish(
        &self,
        subject: &str,
        payload: Vec<u8>,
    ) -> Result<(), Report<InfraError>> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| InfraError::CommandFailed {
                service: SERVICE,
                details: e.to_string(),
            })?;
        Ok(())
    }

    /// Publishes `message` JSON-encoded on `subject`.
    pub async fn publish_json<T: Serialize>(
        &self,
        subject: &str,
        message: &T,
    ) -> Result<(), Report<InfraError>> {
        let payload = serde_json::to_vec(message).map_err(|e| InfraError::Serialization {
            details: e.to_string(),
        })?;
        self.publish(subject, payload).await
    }

    /// Subscribes to `subject`; the returned subscriber is a stream of messages.
    pub async fn subscribe(
        &self,
        subject: &str,
    ) -> Result<async_nats::Subscriber, Report<InfraError>> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| InfraError::CommandFailed {
                service: SERVICE,
                details: e.to_string(),
            })?;
        Ok(subscriber)
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.client.connection_state() == State::Connected
    }
}
