//! Infrastructure error types.

use std::fmt;

/// Errors from the store, cache and broker clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfraError {
    /// A connection could not be established.
    ConnectionFailed { service: &'static str, details: String },
    /// A command against an established connection failed.
    CommandFailed { service: &'static str, details: String },
    /// A payload could not be encoded or decoded.
    Serialization { details: String },
}

impl fmt::Display for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed { service, details } => {
                write!(f, "failed to connect to {service}: {details}")
            }
            Self::CommandFailed { service, details } => {
                write!(f, "{service} command failed: {details}")
            }
            Self::Serialization { details } => {
                write!(f, "serialization failed: {details}")
            }
        }
    }
}

impl std::error::Error for InfraError {}
