//! Authentication context decoded from a client token.

use secrecy::Secret;
use serde::Deserialize;
use url::Url;

/// Immutable capability bundle for one client session.
///
/// Decoding and signature validation of the client token itself belong to an
/// external collaborator; this type is the decoded payload, with wire names
/// matching the gateway's token format. Fields are private and read-only for
/// the lifetime of the client, which makes unsynchronized concurrent reads
/// safe.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    client_api_url: Url,
    authorization_fingerprint: Secret<String>,
    #[serde(default)]
    paypal_enabled: bool,
    #[serde(default)]
    challenges: Vec<Challenge>,
    #[serde(default)]
    analytics: Option<AnalyticsConfig>,
}

/// Extra verification the gateway requires when adding a card.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Challenge {
    /// The card's verification code must be collected.
    Cvv,
    /// The billing postal code must be collected.
    PostalCode,
}

/// Analytics side-channel configuration. Presence enables the channel.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Endpoint analytics events are posted to.
    pub url: Url,
}

impl AuthContext {
    /// Creates a context with the two mandatory capabilities; everything
    /// else defaults to disabled.
    pub fn new(client_api_url: Url, authorization_fingerprint: Secret<String>) -> Self {
        Self {
            client_api_url,
            authorization_fingerprint,
            paypal_enabled: false,
            challenges: Vec::new(),
            analytics: None,
        }
    }

    /// Enables or disables the PayPal capability.
    pub fn with_paypal_enabled(mut self, enabled: bool) -> Self {
        self.paypal_enabled = enabled;
        self
    }

    /// Sets the card challenges required by the gateway.
    pub fn with_challenges(mut self, challenges: Vec<Challenge>) -> Self {
        self.challenges = challenges;
        self
    }

    /// Enables analytics, posted to `url`.
    pub fn with_analytics_url(mut self, url: Url) -> Self {
        self.analytics = Some(AnalyticsConfig { url });
        self
    }

    /// Base URL of the gateway API.
    pub fn client_api_url(&self) -> &Url {
        &self.client_api_url
    }

    /// The session-scoped authorization fingerprint.
    pub fn authorization_fingerprint(&self) -> &Secret<String> {
        &self.authorization_fingerprint
    }

    /// Whether PayPal is supported and enabled for this session.
    pub fn paypal_enabled(&self) -> bool {
        self.paypal_enabled
    }

    /// Whether a card verification code is required to add a card.
    pub fn cvv_challenge_required(&self) -> bool {
        self.challenges.contains(&Challenge::Cvv)
    }

    /// Whether a postal code is required to add a card.
    pub fn postal_code_challenge_required(&self) -> bool {
        self.challenges.contains(&Challenge::PostalCode)
    }

    /// Whether the analytics side channel is enabled.
    pub fn analytics_enabled(&self) -> bool {
        self.analytics.is_some()
    }

    /// Analytics endpoint, when enabled.
    pub fn analytics_url(&self) -> Option<&Url> {
        self.analytics.as_ref().map(|analytics| &analytics.url)
    }
}
