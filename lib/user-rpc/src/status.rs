//! Translation between the error taxonomy and gRPC statuses.
//!
//! Taxonomy errors keep their message in the status message and their
//! details in the status details payload, so the gateway can rebuild the
//! exact value the service produced. Anything else crossing the boundary
//! is logged and collapsed to a generic internal failure.

use tonic::{Code, Status};
use usergate_core::Error;

/// Maps an HTTP-style status code to a gRPC code.
#[must_use]
pub fn grpc_code_for(status_code: u16) -> Code {
    match status_code {
        200 => Code::Ok,
        400 => Code::InvalidArgument,
        401 => Code::Unauthenticated,
        403 => Code::PermissionDenied,
        404 => Code::NotFound,
        409 => Code::AlreadyExists,
        503 => Code::Unavailable,
        _ => Code::Internal,
    }
}

/// Encodes a taxonomy error as a gRPC status.
#[must_use]
pub fn status_from_error(error: &Error) -> Status {
    let code = grpc_code_for(error.status_code());
    match error.details() {
        Some(details) => Status::with_details(
            code,
            error.message(),
            details.as_bytes().to_vec().into(),
        ),
        None => Status::new(code, error.message()),
    }
}

/// Encodes any error as a gRPC status.
///
/// Only [`Error`] values are passed through; foreign error types never
/// reach the caller verbatim.
#[must_use]
pub fn to_rpc_status(error: &(dyn std::error::Error + 'static)) -> Status {
    match error.downcast_ref::<Error>() {
        Some(error) => status_from_error(error),
        None => {
            tracing::error!(error = %error, "unexpected error type at RPC boundary");
            status_from_error(&Error::internal())
        }
    }
}

/// Rebuilds a taxonomy error from a gRPC status.
#[must_use]
pub fn error_from_status(status: &Status) -> Error {
    let base = match status.code() {
        Code::InvalidArgument => Error::bad_request(),
        Code::Unauthenticated => Error::unauthorized(),
        Code::PermissionDenied => Error::forbidden(),
        Code::NotFound => Error::not_found(),
        Code::AlreadyExists => Error::conflict(),
        // Transport failures also surface as Unavailable; their text stays out.
        Code::Unavailable => return Error::unavailable(),
        Code::Internal => Error::internal(),
        code => {
            tracing::warn!(?code, message = status.message(), "unmapped RPC status");
            return Error::internal();
        }
    };

    // tonic reports its own decode and transport failures as Internal;
    // their text stays out.
    let error = if status.message().is_empty() || status.code() == Code::Internal {
        base
    } else {
        base.with_message(status.message())
    };

    if status.details().is_empty() {
        error
    } else {
        error.with_details(String::from_utf8_lossy(status.details()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_deterministically() {
        assert_eq!(grpc_code_for(200), Code::Ok);
        assert_eq!(grpc_code_for(400), Code::InvalidArgument);
        assert_eq!(grpc_code_for(401), Code::Unauthenticated);
        assert_eq!(grpc_code_for(403), Code::PermissionDenied);
        assert_eq!(grpc_code_for(404), Code::NotFound);
        assert_eq!(grpc_code_for(409), Code::AlreadyExists);
        assert_eq!(grpc_code_for(500), Code::Internal);
        assert_eq!(grpc_code_for(503), Code::Unavailable);
        assert_eq!(grpc_code_for(418), Code::Internal);
    }

    #[test]
    fn taxonomy_error_keeps_message_and_details() {
        let error = Error::conflict().with_details("Email already taken");
        let status = to_rpc_status(&error);

        assert_eq!(status.code(), Code::AlreadyExists);
        assert_eq!(status.message(), "Resource conflict");
        assert_eq!(status.details(), b"Email already taken");
        assert_eq!(error_from_status(&status), error);
    }

    #[test]
    fn foreign_errors_collapse_to_internal() {
        let foreign = std::io::Error::other("connection reset by peer at 10.0.0.7");
        let status = to_rpc_status(&foreign);

        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "Internal server error");
        assert!(status.details().is_empty());
    }

    #[test]
    fn unavailable_status_drops_transport_text() {
        let status = Status::unavailable("tcp connect error: Connection refused");
        let error = error_from_status(&status);
        assert_eq!(error, Error::unavailable());
    }

    #[test]
    fn internal_status_keeps_canonical_message() {
        let error = error_from_status(&Status::internal("h2 protocol error: frame too large"));
        assert_eq!(error, Error::internal());

        let status = status_from_error(&Error::internal().with_details("store unavailable: timed out"));
        let error = error_from_status(&status);
        assert_eq!(error.message(), "Internal server error");
        assert_eq!(error.details(), Some("store unavailable: timed out"));
    }

    #[test]
    fn unmapped_codes_become_internal() {
        let error = error_from_status(&Status::deadline_exceeded("deadline has elapsed"));
        assert_eq!(error, Error::internal());

        let error = error_from_status(&Status::not_found("User not found"));
        assert_eq!(error.kind(), usergate_core::ErrorKind::NotFound);
        assert_eq!(error.message(), "User not found");
    }
}
