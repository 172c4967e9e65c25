//! Key/value cache client backed by Redis.

use crate::error::InfraError;
use redis::aio::MultiplexedConnection;
use rootcause::prelude::Report;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const SERVICE: &str = "redis";

/// Redis connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub db: i64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: String::new(),
            db: 0,
        }
    }
}

impl CacheConfig {
    /// Renders the settings as a `redis://` connection URL.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if the host does not form a valid URL.
    pub fn connection_url(&self) -> Result<String, InfraError> {
        let invalid = |details: String| InfraError::ConnectionFailed {
            service: SERVICE,
            details,
        };

        let mut url = Url::parse(&format!("redis://{}:{}/{}", self.host, self.port, self.db))
            .map_err(|e| invalid(format!("invalid redis address: {e}")))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|()| invalid("password cannot be set on this address".to_string()))?;
        }
        Ok(url.into())
    }
}

/// Shared handle to the cache.
///
/// Wraps a multiplexed connection; clones share the same socket.
#[derive(Clone)]
pub struct CacheClient {
    conn: MultiplexedConnection,
}

impl std::fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheClient").finish_non_exhaustive()
    }
}

fn command_failed(e: redis::RedisError) -> InfraError {
    InfraError::CommandFailed {
        service: SERVICE,
        details: e.to_string(),
    }
}

impl CacheClient {
    /// Connects to Redis and verifies the connection with `PING`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if Redis is unreachable.
    #[tracing::instrument(skip_all, fields(host = %config.host, port = config.port))]
    pub async fn connect(config: &CacheConfig) -> Result<Self, Report<InfraError>> {
        let connection_failed = |e: redis::RedisError| InfraError::ConnectionFailed {
            service: SERVICE,
            details: e.to_string(),
        };

        let client = redis::Client::open(config.connection_url()?).map_err(connection_failed)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_failed)?;

        let cache = Self { conn };
        cache.ping().await?;

        tracing::info!("Connected to Redis");
        Ok(cache)
    }

    /// Round-trips a `PING`.
    pub async fn ping(&self) -> Result<(), Report<InfraError>> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(command_failed)?;
        Ok(())
    }

    /// Returns the value at `key`, or `None` on a miss.
    pub async fn get(&self, key: &str) -> Result<Option<String>, Report<InfraError>> {
        let mut conn = self.conn.clone();
        let value = redis::cmd("GET")
            .arg(key)
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(command_failed)?;
        Ok(value)
    }

    /// Stores `value` at `key`. A zero `ttl` stores without expiry.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Report<InfraError>> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if !ttl.is_zero() {
            cmd.arg("PX").arg(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX));
        }
        cmd.query_async::<()>(&mut conn)
            .await
            .map_err(command_failed)?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), Report<InfraError>> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(command_failed)?;
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> Result<bool, Report<InfraError>> {
        let mut conn = self.conn.clone();
        let count = redis::cmd("EXISTS")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(command_failed)?;
        Ok(count > 0)
    }

    /// Reads a JSON-encoded value.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, Report<InfraError>> {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|e| InfraError::Serialization {
            details: e.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Stores `value` JSON-encoded.
    pub async fn set_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), Report<InfraError>> {
        let raw = serde_json::to_string(value).map_err(|e| InfraError::Serialization {
            details: e.to_string(),
        })?;
        self.set(key, &raw, ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_url_without_password() {
        let config = CacheConfig::default();
        assert_eq!(config.connection_url().unwrap(), "redis://localhost:6379/0");
    }

    #[test]
    fn connection_url_encodes_password() {
        let config = CacheConfig {
            password: "p@ss word".to_string(),
            db: 2,
            ..CacheConfig::default()
        };
        assert_eq!(
            config.connection_url().unwrap(),
            "redis://:p%40ss%20word@localhost:6379/2"
        );
    }

    #[tokio::test]
    #[ignore = "requires a running Redis at localhost:6379"]
    async fn round_trips_values() {
        let cache = CacheClient::connect(&CacheConfig::default()).await.unwrap();

        cache
            .set_json("usergate:test", &vec![1, 2, 3], Duration::from_secs(5))
            .await
            .unwrap();
        let value: Option<Vec<i32>> = cache.get_json("usergate:test").await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
        assert!(cache.exists("usergate:test").await.unwrap());

        cache.delete("usergate:test").await.unwrap();
        assert_eq!(cache.get("usergate:test").await.unwrap(), None);
    }
}
