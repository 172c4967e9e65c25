//! Core types shared by every usergate crate.
//!
//! This crate carries the canonical [`Error`] value that both the HTTP and
//! the RPC surfaces encode, plus the rootcause-backed [`Result`] alias used
//! on start-up and infrastructure paths.

pub mod error;

pub use error::{Error, ErrorKind, Result};
