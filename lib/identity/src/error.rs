//! Error types for identity resolution.

use std::fmt;

/// Errors from talking to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider rejected the token, or no token was given.
    InvalidToken { reason: String },
    /// The provider could not be reached or answered with something unreadable.
    TransportFailure { reason: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { reason } => write!(f, "invalid token: {reason}"),
            Self::TransportFailure { reason } => {
                write!(f, "identity provider unreachable: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}
