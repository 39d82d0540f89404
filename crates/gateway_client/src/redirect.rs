//! External wallet redirect handshake.
//!
//! The handshake transfers control to an external wallet-authorization
//! surface and later consumes exactly one completion signal. The pending
//! state is tracked explicitly so a duplicate completion can be rejected
//! without a real launcher in the loop.

use error_stack::{report, IntoReport, ResultExt};
use serde::Deserialize;

use crate::{
    errors::{CustomResult, GatewayError},
    payment_methods::PayPalAccountBuilder,
};

/// Collaborator that hands control to the external wallet-authorization
/// surface. The transport by which the completion pair comes back is owned
/// by the host environment.
pub trait WalletRedirectLauncher {
    /// Launches the authorization surface for the given correlation code.
    fn launch(&self, correlation_code: u64);
}

/// Completion signal of the external authorization surface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirectResultCode {
    /// The user authorized the wallet.
    Ok,
    /// The user backed out. Not a failure.
    Canceled,
}

/// The `(result code, payload)` pair handed back by the host environment.
/// Consumed exactly once by [`RedirectHandshake::finish`].
#[derive(Clone, Debug)]
pub struct PendingRedirectResult {
    /// How the external surface concluded.
    pub result_code: RedirectResultCode,
    /// Opaque payload; decoded only on a successful result.
    pub payload: bytes::Bytes,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum HandshakeState {
    #[default]
    Idle,
    AwaitingResult,
    Finished,
}

/// Wire shape of a successful authorization payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayPalRedirectPayload {
    consent_code: String,
    #[serde(default)]
    correlation_id: Option<String>,
}

/// State machine correlating one external wallet authorization round trip.
#[derive(Debug, Default)]
pub struct RedirectHandshake {
    state: HandshakeState,
    correlation_code: Option<u64>,
}

impl RedirectHandshake {
    /// Creates an idle handshake.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a completion signal is currently expected.
    pub fn is_awaiting_result(&self) -> bool {
        self.state == HandshakeState::AwaitingResult
    }

    /// Correlation code recorded by the last [`start`](Self::start).
    pub fn correlation_code(&self) -> Option<u64> {
        self.correlation_code
    }

    /// Starts the authorization flow: records the correlation code and hands
    /// control to the launcher. Nothing else is retained across the
    /// boundary; whatever the external system produces comes back through
    /// [`finish`](Self::finish).
    pub fn start(&mut self, launcher: &dyn WalletRedirectLauncher, correlation_code: u64) {
        self.correlation_code = Some(correlation_code);
        self.state = HandshakeState::AwaitingResult;
        launcher.launch(correlation_code);
    }

    /// Consumes the completion signal, exactly once per [`start`](Self::start).
    ///
    /// Cancellation yields `Ok(None)`: user-initiated cancellation is not a
    /// failure. A successful result decodes the payload into a
    /// [`PayPalAccountBuilder`], backfilling the handshake's own correlation
    /// code when the payload does not carry one; a payload that does not
    /// decode indicates a credentials/setup mismatch with the wallet
    /// provider and surfaces as [`GatewayError::Configuration`]. A second
    /// completion signal for the same start (or one with no start pending)
    /// is rejected with [`GatewayError::HandshakeNotInProgress`] rather than
    /// silently ignored.
    pub fn finish(
        &mut self,
        result: PendingRedirectResult,
    ) -> CustomResult<Option<PayPalAccountBuilder>, GatewayError> {
        if self.state != HandshakeState::AwaitingResult {
            return Err(report!(GatewayError::HandshakeNotInProgress));
        }
        self.state = HandshakeState::Finished;

        match result.result_code {
            RedirectResultCode::Canceled => Ok(None),
            RedirectResultCode::Ok => {
                let payload: PayPalRedirectPayload = serde_json::from_slice(&result.payload)
                    .into_report()
                    .change_context(GatewayError::Configuration)
                    .attach_printable("unable to decode the wallet authorization payload")?;

                let mut builder = PayPalAccountBuilder::new().consent_code(&payload.consent_code);
                let correlation_id = payload
                    .correlation_id
                    .or_else(|| self.correlation_code.map(|code| code.to_string()));
                if let Some(correlation_id) = correlation_id {
                    builder = builder.correlation_id(&correlation_id);
                }
                Ok(Some(builder))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use bytes::Bytes;

    use super::*;

    struct RecordingLauncher {
        launched_with: Cell<Option<u64>>,
    }

    impl RecordingLauncher {
        fn new() -> Self {
            Self {
                launched_with: Cell::new(None),
            }
        }
    }

    impl WalletRedirectLauncher for RecordingLauncher {
        fn launch(&self, correlation_code: u64) {
            self.launched_with.set(Some(correlation_code));
        }
    }

    fn authorized_result() -> PendingRedirectResult {
        PendingRedirectResult {
            result_code: RedirectResultCode::Ok,
            payload: Bytes::from_static(
                br#"{"consentCode": "consent-abc", "correlationId": "corr-1"}"#,
            ),
        }
    }

    #[test]
    fn start_launches_the_external_surface() {
        let launcher = RecordingLauncher::new();
        let mut handshake = RedirectHandshake::new();
        handshake.start(&launcher, 42);
        assert_eq!(launcher.launched_with.get(), Some(42));
        assert!(handshake.is_awaiting_result());
    }

    #[test]
    fn cancellation_yields_no_builder_and_no_error() {
        let launcher = RecordingLauncher::new();
        let mut handshake = RedirectHandshake::new();
        handshake.start(&launcher, 42);
        let builder = handshake
            .finish(PendingRedirectResult {
                result_code: RedirectResultCode::Canceled,
                payload: Bytes::new(),
            })
            .expect("cancellation is not a failure");
        assert!(builder.is_none());
    }

    #[test]
    fn successful_result_decodes_into_a_builder() {
        let launcher = RecordingLauncher::new();
        let mut handshake = RedirectHandshake::new();
        handshake.start(&launcher, 42);
        let builder = handshake
            .finish(authorized_result())
            .expect("payload decodes")
            .expect("authorized result produces a builder");
        let params = crate::payment_methods::PaymentMethodBuilder::request_params(&builder)
            .expect("builder serializes");
        assert_eq!(
            params["paypalAccount"]["consentCode"],
            serde_json::json!("consent-abc")
        );
        assert_eq!(
            params["paypalAccount"]["correlationId"],
            serde_json::json!("corr-1")
        );
    }

    #[test]
    fn handshake_code_backfills_a_missing_correlation_id() {
        let launcher = RecordingLauncher::new();
        let mut handshake = RedirectHandshake::new();
        handshake.start(&launcher, 42);
        assert_eq!(handshake.correlation_code(), Some(42));
        let builder = handshake
            .finish(PendingRedirectResult {
                result_code: RedirectResultCode::Ok,
                payload: Bytes::from_static(br#"{"consentCode": "consent-abc"}"#),
            })
            .expect("payload decodes")
            .expect("authorized result produces a builder");
        let params = crate::payment_methods::PaymentMethodBuilder::request_params(&builder)
            .expect("builder serializes");
        assert_eq!(
            params["paypalAccount"]["correlationId"],
            serde_json::json!("42")
        );
    }

    #[test]
    fn undecodable_payload_is_a_configuration_error() {
        let launcher = RecordingLauncher::new();
        let mut handshake = RedirectHandshake::new();
        handshake.start(&launcher, 42);
        let error = handshake
            .finish(PendingRedirectResult {
                result_code: RedirectResultCode::Ok,
                payload: Bytes::from_static(b"not json"),
            })
            .expect_err("garbage payload must not produce a builder");
        assert!(matches!(
            error.current_context(),
            GatewayError::Configuration
        ));
    }

    #[test]
    fn second_completion_for_the_same_start_is_rejected() {
        let launcher = RecordingLauncher::new();
        let mut handshake = RedirectHandshake::new();
        handshake.start(&launcher, 42);
        handshake
            .finish(authorized_result())
            .expect("first completion is consumed");
        let error = handshake
            .finish(authorized_result())
            .expect_err("second completion must be rejected");
        assert!(matches!(
            error.current_context(),
            GatewayError::HandshakeNotInProgress
        ));
    }

    #[test]
    fn completion_without_a_start_is_rejected() {
        let mut handshake = RedirectHandshake::new();
        let error = handshake
            .finish(authorized_result())
            .expect_err("completion with nothing pending must be rejected");
        assert!(matches!(
            error.current_context(),
            GatewayError::HandshakeNotInProgress
        ));
    }
}
