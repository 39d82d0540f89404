//! Raw and classified gateway responses.

use error_stack::report;

use crate::errors::{CustomResult, ErrorWithResponse, GatewayError};

/// Raw result of one gateway round trip. Status interpretation is strictly
/// the classifier's job; the executor hands this over untouched.
#[derive(Clone, Debug)]
pub struct Response {
    /// HTTP status code the gateway answered with.
    pub status_code: u16,
    /// Response headers, when the transport exposed them.
    pub headers: Option<http::HeaderMap>,
    /// Response body, verbatim.
    pub response: bytes::Bytes,
}

/// Fatal failure classes. Each maps to exactly one status code except
/// [`FatalKind::Unexpected`], which covers everything outside the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FatalKind {
    /// 401
    Unauthenticated,
    /// 403
    Unauthorized,
    /// 426
    UpgradeRequired,
    /// 500
    ServerError,
    /// 503
    Unavailable,
    /// Any other non-2xx, non-422 status.
    Unexpected,
}

/// Typed outcome of classifying a [`Response`]. Exactly one variant is
/// produced per response; classification depends only on the status code,
/// the body is carried through without inspection.
#[derive(Clone, Debug)]
pub enum ClassifiedOutcome {
    /// 200, 201 or 202 with the body unchanged.
    Success(bytes::Bytes),
    /// 422: recoverable, the caller is expected to fix the input and retry.
    ValidationFailure {
        /// The 422 status code, kept for the error surface.
        status_code: u16,
        /// Response body, verbatim.
        body: bytes::Bytes,
    },
    /// Everything else; non-recoverable.
    Fatal(FatalKind),
}

impl ClassifiedOutcome {
    /// Converts the outcome into a result, parsing validation detail out of
    /// 422 bodies. This is the single point where status semantics become
    /// typed errors.
    pub fn into_result(self) -> CustomResult<bytes::Bytes, GatewayError> {
        match self {
            Self::Success(body) => Ok(body),
            Self::ValidationFailure { status_code, body } => Err(report!(
                GatewayError::Validation(ErrorWithResponse::from_response(status_code, &body))
            )),
            Self::Fatal(kind) => Err(report!(GatewayError::from(kind))),
        }
    }
}
