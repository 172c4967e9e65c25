//! The usergate HTTP gateway.
//!
//! Authenticates callers against the identity provider, validates input,
//! and forwards user operations to the user service over RPC.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;
