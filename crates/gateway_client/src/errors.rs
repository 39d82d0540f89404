//! Error types surfaced by gateway operations.

use serde::Deserialize;

use crate::types::FatalKind;

/// Result type carrying an `error_stack` report for the error variant.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Transport-level failures raised while building or sending a request.
///
/// These never encode a gateway status code; non-2xx responses are data for
/// the classifier, not errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The request URL could not be parsed.
    #[error("URL encoding of request failed")]
    UrlEncodingFailed,
    /// The underlying HTTP client could not be constructed.
    #[error("failed to construct the HTTP client")]
    ClientConstructionFailed,
    /// The request body could not be serialized.
    #[error("failed to encode request body")]
    BodyEncodingFailed,
    /// The request never produced a response.
    #[error("error while sending the request: {0}")]
    RequestNotSent(String),
    /// The response body could not be read off the wire.
    #[error("failed to read the response body")]
    ResponseDecodingFailed,
}

/// Failure taxonomy for gateway operations.
///
/// Every kind except [`GatewayError::Validation`] is non-recoverable from the
/// caller's perspective and aborts the current operation; a validation
/// failure is expected to be re-prompted and resubmitted. The client performs
/// zero automatic retries and never conflates one kind with another.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 401: the authorization fingerprint was rejected.
    #[error("authentication failed, the authorization fingerprint was rejected")]
    Unauthenticated,
    /// 403: the token does not permit this operation.
    #[error("authorization failed, the token does not permit this operation")]
    Unauthorized,
    /// 426: this client version is no longer accepted by the gateway.
    #[error("the client version is no longer supported by the gateway")]
    UpgradeRequired,
    /// 500: the gateway encountered an internal error.
    #[error("the gateway encountered an internal error")]
    ServerError,
    /// 503: the gateway is down for maintenance.
    #[error("the gateway is unavailable")]
    Unavailable,
    /// Any status code outside the classification table.
    #[error("the gateway returned an unexpected response")]
    Unexpected,
    /// 422: the request failed server-side validation.
    #[error("request failed validation (status {})", .0.status_code)]
    Validation(ErrorWithResponse),
    /// The response shape did not match the protocol.
    #[error("failed to parse the gateway response")]
    ResponseParsingFailed,
    /// The request body could not be serialized.
    #[error("failed to encode the request")]
    RequestEncodingFailed,
    /// The request could not be delivered to the gateway.
    #[error("failed to send request to the gateway")]
    RequestFailed,
    /// Wallet provider credentials or setup are invalid.
    #[error("wallet provider configuration is invalid")]
    Configuration,
    /// A redirect completion signal arrived with no handshake awaiting one.
    #[error("no redirect handshake is awaiting completion")]
    HandshakeNotInProgress,
}

impl From<FatalKind> for GatewayError {
    fn from(kind: FatalKind) -> Self {
        match kind {
            FatalKind::Unauthenticated => Self::Unauthenticated,
            FatalKind::Unauthorized => Self::Unauthorized,
            FatalKind::UpgradeRequired => Self::UpgradeRequired,
            FatalKind::ServerError => Self::ServerError,
            FatalKind::Unavailable => Self::Unavailable,
            FatalKind::Unexpected => Self::Unexpected,
        }
    }
}

/// A 422 validation failure together with the raw response body and whatever
/// field-level detail could be parsed out of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorWithResponse {
    /// Status code the gateway answered with, always 422.
    pub status_code: u16,
    /// The response body, verbatim.
    pub body: String,
    /// Top-level error message, when the body carried one.
    pub message: Option<String>,
    /// Field-level validation errors, when the body carried them.
    pub field_errors: Vec<FieldError>,
}

/// One field-level validation error; nested for composite fields.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Name of the rejected field.
    pub field: String,
    /// Human-readable rejection reason.
    #[serde(default)]
    pub message: Option<String>,
    /// Errors on nested fields.
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidationBody {
    #[serde(default)]
    error: Option<TopLevelError>,
    #[serde(default)]
    field_errors: Vec<FieldError>,
}

#[derive(Debug, Deserialize)]
struct TopLevelError {
    message: Option<String>,
}

impl ErrorWithResponse {
    /// Parses the body leniently; an unparseable body still produces a
    /// validation error carrying the verbatim text.
    pub(crate) fn from_response(status_code: u16, body: &[u8]) -> Self {
        let parsed: ValidationBody = serde_json::from_slice(body).unwrap_or_default();
        Self {
            status_code,
            body: String::from_utf8_lossy(body).into_owned(),
            message: parsed.error.and_then(|error| error.message),
            field_errors: parsed.field_errors,
        }
    }
}
