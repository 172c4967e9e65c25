//! Error taxonomy shared by the gateway and the user service.
//!
//! [`Error`] is an immutable value: status code, machine-readable code tag,
//! human message and optional details. Transports only re-encode it; they
//! never invent new kinds. Layer-specific failures (identity provider,
//! repository, infrastructure) have their own enums and are translated into
//! this value at the use-case or transport boundary.

use rootcause::Report;
use serde::Serialize;
use std::fmt;

/// A Result type alias using rootcause's Report for error handling.
///
/// Used on start-up and infrastructure paths where errors are reported,
/// not returned to a caller.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

/// The closed set of error kinds, independent of transport encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    /// Reserved; no current rule produces it.
    Forbidden,
    NotFound,
    Conflict,
    Internal,
    Unavailable,
}

impl ErrorKind {
    /// Classifies an HTTP status code. Unknown codes are `Internal`.
    #[must_use]
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            503 => Self::Unavailable,
            _ => Self::Internal,
        }
    }
}

/// Canonical error value carried across the HTTP and RPC surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Error {
    status_code: u16,
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl Error {
    /// Creates an error from its raw parts.
    #[must_use]
    pub fn new(status_code: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn bad_request() -> Self {
        Self::new(400, "BAD_REQUEST", "Invalid request")
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(401, "UNAUTHORIZED", "Unauthorized")
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(403, "FORBIDDEN", "Forbidden")
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(404, "NOT_FOUND", "Resource not found")
    }

    #[must_use]
    pub fn conflict() -> Self {
        Self::new(409, "CONFLICT", "Resource conflict")
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(500, "INTERNAL_ERROR", "Internal server error")
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(503, "SERVICE_UNAVAILABLE", "Service unavailable")
    }

    /// Returns a copy carrying a different human message.
    #[must_use]
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self.clone()
        }
    }

    /// Returns a copy carrying `details`. The receiver is left untouched.
    #[must_use]
    pub fn with_details(&self, details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_status(self.status_code)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
