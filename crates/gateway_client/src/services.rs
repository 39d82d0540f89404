//! Request execution and response classification.
//!
//! [`send_request`] performs one network round trip and reports transport
//! failures only; [`classify`] is a pure function of the status code. The
//! table in `classify` is the single source of truth for status semantics.

use error_stack::{IntoReport, ResultExt};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::{
    auth::AuthContext,
    consts,
    errors::{ApiClientError, CustomResult},
    request::{Method, Request},
    types::{ClassifiedOutcome, FatalKind, Response},
};

/// Builds the HTTP client shared by all operations of one gateway client.
pub(crate) fn create_client() -> CustomResult<reqwest::Client, ApiClientError> {
    reqwest::Client::builder()
        .build()
        .into_report()
        .change_context(ApiClientError::ClientConstructionFailed)
}

/// Performs one round trip against the gateway.
///
/// The authorization fingerprint is injected into every request: as a query
/// parameter for GET, as a body field for POST. A caller-supplied value for
/// the same key is never overwritten. POST bodies always go out as JSON with
/// the matching `Content-Type` header.
///
/// Non-2xx statuses are returned as data; the only errors raised here are
/// transport-level. One attempt per call, no retries, no internal timeout.
#[instrument(skip_all, fields(method = %request.method, url = %request.url))]
pub async fn send_request(
    client: &reqwest::Client,
    auth: &AuthContext,
    request: Request,
) -> CustomResult<Response, ApiClientError> {
    let mut url = reqwest::Url::parse(&request.url)
        .into_report()
        .change_context(ApiClientError::UrlEncodingFailed)?;

    let request_builder = match request.method {
        Method::Get => {
            {
                let mut pairs = url.query_pairs_mut();
                for (key, value) in &request.params {
                    pairs.append_pair(key, &query_value(value));
                }
                if !request.params.contains_key(consts::AUTHORIZATION_FINGERPRINT_KEY) {
                    pairs.append_pair(
                        consts::AUTHORIZATION_FINGERPRINT_KEY,
                        auth.authorization_fingerprint().expose_secret(),
                    );
                }
            }
            client.get(url)
        }
        Method::Post => {
            let mut body = request.params;
            body.entry(consts::AUTHORIZATION_FINGERPRINT_KEY.to_string())
                .or_insert_with(|| {
                    serde_json::Value::String(
                        auth.authorization_fingerprint().expose_secret().clone(),
                    )
                });
            client
                .post(url)
                .header(http::header::CONTENT_TYPE.as_str(), "application/json")
                .json(&serde_json::Value::Object(body))
        }
    };

    let request_builder = request
        .headers
        .into_iter()
        .fold(request_builder, |builder, (name, value)| {
            builder.header(name, value)
        });

    let response = request_builder
        .send()
        .await
        .map_err(|error| ApiClientError::RequestNotSent(error.to_string()))
        .into_report()
        .attach_printable("unable to send request to the gateway")?;

    let status_code = response.status().as_u16();
    let headers = Some(response.headers().to_owned());
    let body = response
        .bytes()
        .await
        .into_report()
        .change_context(ApiClientError::ResponseDecodingFailed)
        .attach_printable("error while reading the response body")?;

    tracing::debug!(status_code, "received gateway response");

    Ok(Response {
        status_code,
        headers,
        response: body,
    })
}

fn query_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Classifies a raw response. Total and pure over the status code: the body
/// is never inspected, it is only carried through for the success and
/// validation variants.
pub fn classify(response: &Response) -> ClassifiedOutcome {
    match response.status_code {
        200 | 201 | 202 => ClassifiedOutcome::Success(response.response.clone()),
        401 => ClassifiedOutcome::Fatal(FatalKind::Unauthenticated),
        403 => ClassifiedOutcome::Fatal(FatalKind::Unauthorized),
        422 => ClassifiedOutcome::ValidationFailure {
            status_code: response.status_code,
            body: response.response.clone(),
        },
        426 => ClassifiedOutcome::Fatal(FatalKind::UpgradeRequired),
        500 => ClassifiedOutcome::Fatal(FatalKind::ServerError),
        503 => ClassifiedOutcome::Fatal(FatalKind::Unavailable),
        _ => ClassifiedOutcome::Fatal(FatalKind::Unexpected),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::errors::GatewayError;

    fn response(status_code: u16, body: &'static [u8]) -> Response {
        Response {
            status_code,
            headers: None,
            response: Bytes::from_static(body),
        }
    }

    #[test]
    fn success_statuses_carry_the_body_unchanged() {
        for status in [200, 201, 202] {
            match classify(&response(status, b"{\"ok\":true}")) {
                ClassifiedOutcome::Success(body) => {
                    assert_eq!(body.as_ref(), b"{\"ok\":true}");
                }
                other => panic!("status {status} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn fatal_statuses_map_per_table() {
        let table = [
            (401, FatalKind::Unauthenticated),
            (403, FatalKind::Unauthorized),
            (426, FatalKind::UpgradeRequired),
            (500, FatalKind::ServerError),
            (503, FatalKind::Unavailable),
        ];
        for (status, expected) in table {
            match classify(&response(status, b"ignored")) {
                ClassifiedOutcome::Fatal(kind) => assert_eq!(kind, expected),
                other => panic!("status {status} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn unlisted_statuses_are_unexpected() {
        for status in [204u16, 301, 400, 404, 418, 429, 502, 504] {
            match classify(&response(status, b"")) {
                ClassifiedOutcome::Fatal(FatalKind::Unexpected) => {}
                other => panic!("status {status} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn classification_ignores_the_body_for_fatal_branches() {
        let with_error_body = classify(&response(503, b"{\"error\":\"maintenance\"}"));
        let with_empty_body = classify(&response(503, b""));
        assert!(matches!(
            with_error_body,
            ClassifiedOutcome::Fatal(FatalKind::Unavailable)
        ));
        assert!(matches!(
            with_empty_body,
            ClassifiedOutcome::Fatal(FatalKind::Unavailable)
        ));
    }

    #[test]
    fn validation_failure_preserves_status_and_body() {
        let outcome = classify(&response(422, b"{\"error\":\"invalid postal code\"}"));
        let error = outcome.into_result().expect_err("422 must not succeed");
        match error.current_context() {
            GatewayError::Validation(details) => {
                assert_eq!(details.status_code, 422);
                assert_eq!(details.body, "{\"error\":\"invalid postal code\"}");
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }
}
