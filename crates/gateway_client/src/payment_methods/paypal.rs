//! PayPal account variant.

use error_stack::{IntoReport, ResultExt};
use serde::{Deserialize, Serialize};

use super::{PaymentMethodBuilder, PaymentMethodOptions, TokenizedPaymentMethod};
use crate::errors::{CustomResult, GatewayError};

/// Builder for tokenizing a PayPal account with the gateway. Usually
/// produced by the redirect handshake rather than constructed by hand.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalAccountBuilder {
    #[serde(skip_serializing_if = "Option::is_none")]
    consent_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
    options: PaymentMethodOptions,
}

impl PayPalAccountBuilder {
    /// Creates an empty builder with validation enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the consent code granted by the wallet authorization flow.
    pub fn consent_code(mut self, consent_code: &str) -> Self {
        self.consent_code = Some(consent_code.to_string());
        self
    }

    /// Sets the correlation id of the wallet authorization flow.
    pub fn correlation_id(mut self, correlation_id: &str) -> Self {
        self.correlation_id = Some(correlation_id.to_string());
        self
    }
}

impl PaymentMethodBuilder for PayPalAccountBuilder {
    type Output = PayPalAccount;

    fn resource_key(&self) -> &'static str {
        "paypalAccounts"
    }

    fn api_path(&self) -> &'static str {
        "paypal_accounts"
    }

    fn request_params(
        &self,
    ) -> CustomResult<serde_json::Map<String, serde_json::Value>, GatewayError> {
        let account = serde_json::to_value(self)
            .into_report()
            .change_context(GatewayError::RequestEncodingFailed)?;
        Ok(serde_json::Map::from_iter([(
            "paypalAccount".to_string(),
            account,
        )]))
    }

    fn with_validation(mut self, validate: bool) -> Self {
        self.options.validate = validate;
        self
    }
}

/// A tokenized PayPal account record.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayPalAccount {
    /// Token referencing this account on the gateway.
    pub nonce: String,
    /// Display description, usually the account email.
    #[serde(default)]
    pub description: Option<String>,
    /// Non-sensitive account details.
    #[serde(default)]
    pub details: Option<PayPalDetails>,
}

/// Non-sensitive details of a tokenized PayPal account.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayPalDetails {
    /// Email of the authorized account.
    #[serde(default)]
    pub email: Option<String>,
}

impl TokenizedPaymentMethod for PayPalAccount {
    fn nonce(&self) -> &str {
        &self.nonce
    }
}
