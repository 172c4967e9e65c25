//! RPC surface of the user service (`user.User`).
//!
//! [`proto`] holds the messages and stubs generated from `proto/user.proto`.
//! [`UserRpc`] is the one seam shared by the service's own logic and by
//! [`UserRpcClient`], so the HTTP gateway can hold either behind the same
//! trait object.
//!
//! Errors cross the boundary as gRPC statuses; see [`status`] for the
//! mapping in both directions.

pub mod client;
pub mod proto;
pub mod server;
pub mod service;
pub mod status;

pub use client::{ClientError, UserRpcClient};
pub use server::{UserRpcService, user_server};
pub use service::UserRpc;
