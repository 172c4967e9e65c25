//! Long-lived infrastructure handles shared by the usergate binaries.
//!
//! Each client is constructed once at start-up from its config, verifies
//! connectivity, and is then cloned freely: the underlying pool or
//! multiplexed connection is internally synchronized.

pub mod cache;
pub mod database;
pub mod error;
pub mod queue;

pub use cache::{CacheClient, CacheConfig};
pub use database::{DatabaseConfig, connect_postgres};
pub use error::InfraError;
pub use queue::{BrokerClient, BrokerConfig};
