//! Card variant.

use error_stack::{IntoReport, ResultExt};
use serde::{Deserialize, Serialize};

use super::{PaymentMethodBuilder, PaymentMethodOptions, TokenizedPaymentMethod};
use crate::errors::{CustomResult, GatewayError};

/// Builder for tokenizing a card with the gateway.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBuilder {
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cvv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    billing_address: Option<BillingAddress>,
    options: PaymentMethodOptions,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct BillingAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_code: Option<String>,
}

impl CardBuilder {
    /// Creates an empty builder with validation enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the card number.
    pub fn number(mut self, number: &str) -> Self {
        self.number = Some(number.to_string());
        self
    }

    /// Sets the expiration month, two digits.
    pub fn expiration_month(mut self, month: &str) -> Self {
        self.expiration_month = Some(month.to_string());
        self
    }

    /// Sets the expiration year, four digits.
    pub fn expiration_year(mut self, year: &str) -> Self {
        self.expiration_year = Some(year.to_string());
        self
    }

    /// Sets the card verification code.
    pub fn cvv(mut self, cvv: &str) -> Self {
        self.cvv = Some(cvv.to_string());
        self
    }

    /// Sets the billing postal code.
    pub fn postal_code(mut self, postal_code: &str) -> Self {
        self.billing_address = Some(BillingAddress {
            postal_code: Some(postal_code.to_string()),
        });
        self
    }
}

impl PaymentMethodBuilder for CardBuilder {
    type Output = Card;

    fn resource_key(&self) -> &'static str {
        "creditCards"
    }

    fn api_path(&self) -> &'static str {
        "credit_cards"
    }

    fn request_params(
        &self,
    ) -> CustomResult<serde_json::Map<String, serde_json::Value>, GatewayError> {
        let card = serde_json::to_value(self)
            .into_report()
            .change_context(GatewayError::RequestEncodingFailed)?;
        Ok(serde_json::Map::from_iter([("creditCard".to_string(), card)]))
    }

    fn with_validation(mut self, validate: bool) -> Self {
        self.options.validate = validate;
        self
    }
}

/// A tokenized card record.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Token referencing this card on the gateway.
    pub nonce: String,
    /// Display description, e.g. "ending in 11".
    #[serde(default)]
    pub description: Option<String>,
    /// Non-sensitive card details.
    #[serde(default)]
    pub details: Option<CardDetails>,
}

/// Non-sensitive details of a tokenized card.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    /// Card network, e.g. "Visa".
    #[serde(default)]
    pub card_type: Option<String>,
    /// Last two digits of the card number.
    #[serde(default)]
    pub last_two: Option<String>,
}

impl TokenizedPaymentMethod for Card {
    fn nonce(&self) -> &str {
        &self.nonce
    }
}
