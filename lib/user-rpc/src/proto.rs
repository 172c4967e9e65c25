//! Wire messages and generated stubs for `user.User`.
//!
//! Generated from `proto/user.proto`. Every message also serializes to
//! JSON so the gateway can hand responses back unchanged.

#![allow(clippy::derive_partial_eq_without_eq)]

tonic::include_proto!("user");
