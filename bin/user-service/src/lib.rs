//! The usergate user service.
//!
//! Requests flow transport -> use-case -> persistence:
//!
//! - [`logic`]: adapts RPC records to use-case calls and encodes errors
//! - [`usecase`]: uniqueness, pagination bounds and not-found rules
//! - [`repository`]: CRUD against the relational store
//!
//! [`events`] publishes lifecycle events after successful mutations.

pub mod config;
pub mod entity;
pub mod events;
pub mod logic;
pub mod repository;
pub mod svc;
pub mod usecase;
