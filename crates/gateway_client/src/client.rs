//! The gateway client and its payment-method protocol.

use error_stack::{report, IntoReport, ResultExt};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::{
    auth::AuthContext,
    consts,
    errors::{ApiClientError, CustomResult, GatewayError},
    payment_methods::{
        PayPalAccount, PaymentMethod, PaymentMethodBuilder, PaymentMethodsResponse,
        TokenizedPaymentMethod,
    },
    redirect::{PendingRedirectResult, RedirectHandshake, WalletRedirectLauncher},
    request::{Method, RequestBuilder},
    services,
};

/// Client for one gateway session.
///
/// Holds the immutable [`AuthContext`] and a reusable HTTP client; no other
/// state is shared across invocations, so concurrent calls on a shared
/// reference are safe.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    auth: AuthContext,
    http_client: reqwest::Client,
}

impl GatewayClient {
    /// Creates a client from a decoded authentication context.
    pub fn new(auth: AuthContext) -> CustomResult<Self, ApiClientError> {
        Ok(Self {
            auth,
            http_client: services::create_client()?,
        })
    }

    /// The session's authentication context.
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Whether PayPal is supported and enabled for this session.
    pub fn paypal_enabled(&self) -> bool {
        self.auth.paypal_enabled()
    }

    /// Whether a card verification code is required to add a card.
    pub fn cvv_challenge_required(&self) -> bool {
        self.auth.cvv_challenge_required()
    }

    /// Whether a postal code is required to add a card.
    pub fn postal_code_challenge_required(&self) -> bool {
        self.auth.postal_code_challenge_required()
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.auth.client_api_url().as_str().trim_end_matches('/'),
            consts::API_VERSION,
            path
        )
    }

    /// Parameters present in every protocol request. Inserted after builder
    /// parameters so they are never overridden by a caller-supplied key.
    fn default_parameters(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::from_iter([(
            consts::AUTHORIZATION_FINGERPRINT_KEY.to_string(),
            serde_json::Value::String(
                self.auth.authorization_fingerprint().expose_secret().clone(),
            ),
        )])
    }

    /// Creates a payment method on the gateway and returns the typed record.
    ///
    /// Validation runs at creation time unless the builder disabled it. A
    /// validation rejection surfaces as [`GatewayError::Validation`]; every
    /// other non-success status maps per the classification table. A success
    /// body missing the variant's resource array, or carrying an empty one,
    /// is [`GatewayError::ResponseParsingFailed`], never a default record.
    #[instrument(skip_all, fields(api_path = builder.api_path()))]
    pub async fn create<B: PaymentMethodBuilder>(
        &self,
        builder: &B,
    ) -> CustomResult<B::Output, GatewayError> {
        let mut params = builder.request_params()?;
        params.extend(self.default_parameters());

        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&self.url(&format!(
                "{}/{}",
                consts::PAYMENT_METHODS_ENDPOINT,
                builder.api_path()
            )))
            .header(http::header::ACCEPT.as_str(), "application/json")
            .params(params)
            .build();

        let response = services::send_request(&self.http_client, &self.auth, request)
            .await
            .change_context(GatewayError::RequestFailed)?;
        let body = services::classify(&response).into_result()?;

        builder.record_from_json(first_for_resource(&body, builder.resource_key())?)
    }

    /// Tokenizes a payment method: creation with validation deferred to a
    /// later server-side use of the returned nonce. A thin composition over
    /// [`create`](Self::create), not a separate code path.
    pub async fn tokenize<B: PaymentMethodBuilder>(
        &self,
        builder: &B,
    ) -> CustomResult<String, GatewayError> {
        let record = self.create(&builder.clone().with_validation(false)).await?;
        Ok(record.nonce().to_string())
    }

    /// Retrieves every payment method tokenized for this session, eagerly
    /// materialized from the response body.
    #[instrument(skip_all)]
    pub async fn list_payment_methods(&self) -> CustomResult<Vec<PaymentMethod>, GatewayError> {
        let request = RequestBuilder::new()
            .method(Method::Get)
            .url(&self.url(consts::PAYMENT_METHODS_ENDPOINT))
            .header(http::header::ACCEPT.as_str(), "application/json")
            .params(self.default_parameters())
            .build();

        let response = services::send_request(&self.http_client, &self.auth, request)
            .await
            .change_context(GatewayError::RequestFailed)?;
        let body = services::classify(&response).into_result()?;

        let parsed: PaymentMethodsResponse = serde_json::from_slice(&body)
            .into_report()
            .change_context(GatewayError::ResponseParsingFailed)
            .attach_printable("unable to parse the payment methods collection")?;
        Ok(parsed.payment_methods)
    }

    /// Starts the PayPal authorization flow on the given handshake.
    pub fn start_pay_with_paypal(
        &self,
        handshake: &mut RedirectHandshake,
        launcher: &dyn WalletRedirectLauncher,
        correlation_code: u64,
    ) {
        handshake.start(launcher, correlation_code);
    }

    /// Completes the PayPal flow: consumes the redirect result and, when the
    /// user authorized, creates the account on the gateway. Cancellation
    /// yields `Ok(None)`.
    pub async fn finish_pay_with_paypal(
        &self,
        handshake: &mut RedirectHandshake,
        result: PendingRedirectResult,
    ) -> CustomResult<Option<PayPalAccount>, GatewayError> {
        match handshake.finish(result)? {
            Some(builder) => Ok(Some(self.create(&builder).await?)),
            None => Ok(None),
        }
    }
}

/// Extracts the first element of the JSON array nested under `resource_key`.
/// A missing key, an empty array or a malformed body all indicate a protocol
/// mismatch.
fn first_for_resource(
    body: &bytes::Bytes,
    resource_key: &str,
) -> CustomResult<serde_json::Value, GatewayError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .into_report()
        .change_context(GatewayError::ResponseParsingFailed)
        .attach_printable("creation response body is not valid JSON")?;

    value
        .get(resource_key)
        .and_then(serde_json::Value::as_array)
        .and_then(|records| records.first())
        .cloned()
        .ok_or_else(|| {
            report!(GatewayError::ResponseParsingFailed).attach_printable(format!(
                "creation response carries no record under {resource_key}"
            ))
        })
}
