//! Payment-method variants and the builder capability set.

pub mod card;
pub mod paypal;

use error_stack::{IntoReport, ResultExt};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, GatewayError};
pub use self::{
    card::{Card, CardBuilder},
    paypal::{PayPalAccount, PayPalAccountBuilder},
};

/// Behaviour common to every tokenized payment-method record.
pub trait TokenizedPaymentMethod {
    /// The one-time-use token referencing this record on the gateway.
    fn nonce(&self) -> &str;
}

/// Capability set a payment-method variant must expose for the protocol to
/// create and parse it. `create` and `tokenize` never branch on the concrete
/// type; a new variant only needs to implement this trait.
pub trait PaymentMethodBuilder: Clone {
    /// Typed record produced from a successful creation response.
    type Output: serde::de::DeserializeOwned + TokenizedPaymentMethod;

    /// JSON key under which the gateway nests this variant's records in a
    /// success response. Never empty.
    fn resource_key(&self) -> &'static str;

    /// Creation sub-path under the payment-methods endpoint.
    fn api_path(&self) -> &'static str;

    /// Top-level request parameters for creation.
    fn request_params(
        &self,
    ) -> CustomResult<serde_json::Map<String, serde_json::Value>, GatewayError>;

    /// Toggles whether the gateway validates the record at creation time.
    /// Disabling defers validation to a later server-side use of the nonce.
    fn with_validation(self, validate: bool) -> Self;

    /// Parses one record out of the JSON fragment nested under
    /// [`resource_key`](Self::resource_key).
    fn record_from_json(&self, json: serde_json::Value) -> CustomResult<Self::Output, GatewayError> {
        serde_json::from_value(json)
            .into_report()
            .change_context(GatewayError::ResponseParsingFailed)
            .attach_printable_lazy(|| format!("unable to parse {} record", self.resource_key()))
    }
}

/// Creation-time options shared by every variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PaymentMethodOptions {
    /// Whether the gateway validates the record when it is created.
    pub validate: bool,
}

impl Default for PaymentMethodOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// One tokenized payment method as returned by the gateway, tagged by
/// resource type. Retrieval returns a mix of variants.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PaymentMethod {
    /// A tokenized card.
    CreditCard(card::Card),
    /// A tokenized PayPal account.
    PayPalAccount(paypal::PayPalAccount),
}

impl TokenizedPaymentMethod for PaymentMethod {
    fn nonce(&self) -> &str {
        match self {
            Self::CreditCard(card) => card.nonce(),
            Self::PayPalAccount(account) => account.nonce(),
        }
    }
}

/// Success body of the payment-methods collection endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentMethodsResponse {
    pub payment_methods: Vec<PaymentMethod>,
}
